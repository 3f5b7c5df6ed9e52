use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::schedule::{Match, Schedule};

/// Formats a match the way it appears in block headers
pub fn format_match_label(pairing: &Match) -> String {
    format!("----- {} vs {} -----", pairing.first, pairing.second)
}

/// Writes the schedule as one block per match: header, host, date, session
pub fn write_schedule<W: Write>(schedule: &Schedule, out: &mut W) -> io::Result<()> {
    for scheduled in &schedule.assignments {
        writeln!(out, "{}", format_match_label(&scheduled.pairing))?;
        writeln!(out, "Host: {}", scheduled.assignment.host)?;
        writeln!(out, "Date: {}", scheduled.assignment.timeslot.day)?;
        writeln!(out, "Session: {}", scheduled.assignment.timeslot.session)?;
    }
    Ok(())
}

/// Writes the schedule to a file in the block format of [`write_schedule`]
pub fn write_schedule_to_file<P: AsRef<Path>>(schedule: &Schedule, path: P) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_schedule(schedule, &mut file)?;
    file.flush()
}

/// Prints a schedule in a readable format
pub fn print_schedule(schedule: &Schedule) {
    println!("\n=== Match Schedule ===");
    println!(
        "Configuration: at most {} parallel per timeslot, at most {} per day",
        schedule.parallel, schedule.max_per_day
    );
    println!("Matches scheduled: {}", schedule.scheduled_count());
    println!("Preferred pairings: {}", schedule.preferred_count);

    if !schedule.unscheduled.is_empty() {
        println!("⚠️  Unscheduled matches ({}):", schedule.unscheduled.len());
        for pairing in &schedule.unscheduled {
            println!("  - {}", pairing);
        }
    }

    println!("\nSchedule by timeslot:");
    for scheduled in &schedule.assignments {
        println!(
            "  {} -> {} (host: {})",
            scheduled.assignment.timeslot, scheduled.pairing, scheduled.assignment.host
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::types::{MatchAssignment, ScheduledMatch, Timeslot};

    fn schedule() -> Schedule {
        Schedule {
            parallel: 1,
            max_per_day: 2,
            assignments: vec![
                ScheduledMatch {
                    pairing: Match::new("ann", "bob"),
                    assignment: MatchAssignment {
                        host: "host1".to_string(),
                        timeslot: Timeslot::new("10/7", "Night"),
                    },
                },
                ScheduledMatch {
                    pairing: Match::new("cy", "dan"),
                    assignment: MatchAssignment {
                        host: "host2".to_string(),
                        timeslot: Timeslot::new("11/7", "Evening"),
                    },
                },
            ],
            unscheduled: vec![Match::new("eve", "fay")],
            preferred_count: 3,
        }
    }

    #[test]
    fn test_write_schedule_blocks() {
        let mut out = Vec::new();
        write_schedule(&schedule(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "----- ann vs bob -----\nHost: host1\nDate: 10/7\nSession: Night\n\
             ----- cy vs dan -----\nHost: host2\nDate: 11/7\nSession: Evening\n"
        );
    }

    #[test]
    fn test_unscheduled_matches_are_not_written() {
        let mut out = Vec::new();
        write_schedule(&schedule(), &mut out).unwrap();
        assert!(!String::from_utf8(out).unwrap().contains("eve"));
    }

    #[test]
    fn test_write_schedule_to_file() {
        let path = std::env::temp_dir().join(format!("match-scheduler-display-{}.txt", std::process::id()));
        write_schedule_to_file(&schedule(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(text.lines().count(), 8);
        assert_eq!(text.lines().next(), Some("----- ann vs bob -----"));
    }
}
