use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::error::ScheduleError;
use crate::schedule::Schedule;

/// Writes one CSV row per scheduled match: `contestant1,contestant2,host,day,session`
pub fn write_schedule_csv<W: Write>(schedule: &Schedule, out: W) -> Result<(), ScheduleError> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(out);

    wtr.write_record(["contestant1", "contestant2", "host", "day", "session"])?;
    for scheduled in &schedule.assignments {
        wtr.write_record([
            &scheduled.pairing.first,
            &scheduled.pairing.second,
            &scheduled.assignment.host,
            &scheduled.assignment.timeslot.day,
            &scheduled.assignment.timeslot.session,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the schedule to a CSV file, replacing any existing file
pub fn export_schedule_to_csv(schedule: &Schedule, csv_path: &Path) -> Result<(), ScheduleError> {
    let file = std::fs::File::create(csv_path)?;
    write_schedule_csv(schedule, file)
}
