use std::collections::{HashMap, HashSet};
use super::types::Timeslot;

/// All timeslots of the event, day by day and session by session
pub fn timeslots(days: &[String], sessions: &[String]) -> Vec<Timeslot> {
    days.iter()
        .flat_map(|day| sessions.iter().map(move |session| Timeslot::new(day.as_str(), session.as_str())))
        .collect()
}

/// Counts how many people listed each timeslot
/// Returns a HashMap: timeslot -> number of sets containing it
pub fn calculate_slot_popularity<'a, I>(sets: I) -> HashMap<Timeslot, u32>
where
    I: IntoIterator<Item = &'a HashSet<Timeslot>>,
{
    let mut popularity = HashMap::new();
    for set in sets {
        for timeslot in set {
            *popularity.entry(timeslot.clone()).or_insert(0) += 1;
        }
    }
    popularity
}
