use std::collections::{HashMap, HashSet};
use serde::{Serialize, Deserialize};
use crate::error::{Role, ScheduleError, SlotKind};
use super::types::{Match, Timeslot};

pub type SlotSets = HashMap<String, HashSet<Timeslot>>;

/// Everything the solver needs to know about one event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleProblem {
    pub max_parallel: u32,
    pub days: Vec<String>,
    pub sessions: Vec<String>,
    pub hosts: Vec<String>,
    pub contestants: Vec<String>,
    pub matches: Vec<Match>,
    pub host_availability: SlotSets,
    pub host_preference: SlotSets,
    pub contestant_availability: SlotSets,
    pub contestant_preference: SlotSets,
}

/// Per-person timeslots split into two disjoint sets
#[derive(Debug, Clone, Default)]
pub struct Availability {
    /// Slots the person can attend but did not mark as preferred
    pub available: HashSet<Timeslot>,
    pub preferred: HashSet<Timeslot>,
}

impl Availability {
    fn from_sets(available: Option<&HashSet<Timeslot>>, preferred: Option<&HashSet<Timeslot>>) -> Self {
        let preferred = preferred.cloned().unwrap_or_default();
        let available = available
            .map(|slots| slots.difference(&preferred).cloned().collect())
            .unwrap_or_default();
        Availability { available, preferred }
    }
}

/// Normalized availability of every host and contestant
#[derive(Debug, Clone, Default)]
pub struct NormalizedAvailability {
    pub hosts: HashMap<String, Availability>,
    pub contestants: HashMap<String, Availability>,
}

fn require(sets: &SlotSets, role: Role, name: &str, kind: SlotKind) -> Result<(), ScheduleError> {
    if sets.contains_key(name) {
        Ok(())
    } else {
        Err(ScheduleError::MissingAvailability {
            role,
            name: name.to_string(),
            kind,
        })
    }
}

impl ScheduleProblem {
    /// Number of (day, session) pairs
    pub fn timeslot_count(&self) -> usize {
        self.days.len() * self.sessions.len()
    }

    /// Checks that the search parameters are usable and that every host and
    /// every contestant taking part in a match has both timeslot sets.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.max_parallel == 0 {
            return Err(ScheduleError::InvalidParameter(
                "max_parallel must be at least 1".to_string(),
            ));
        }

        for host in &self.hosts {
            require(&self.host_availability, Role::Host, host, SlotKind::Available)?;
            require(&self.host_preference, Role::Host, host, SlotKind::Preferred)?;
        }

        let contestants: HashSet<&str> = self.contestants.iter().map(String::as_str).collect();
        for pairing in &self.matches {
            if pairing.first == pairing.second {
                return Err(ScheduleError::InvalidMatch(format!(
                    "{} cannot play against themself",
                    pairing.first
                )));
            }
            for name in pairing.contestants() {
                if !contestants.contains(name) {
                    return Err(ScheduleError::UnknownContestant {
                        first: pairing.first.clone(),
                        second: pairing.second.clone(),
                        name: name.to_string(),
                    });
                }
                require(&self.contestant_availability, Role::Contestant, name, SlotKind::Available)?;
                require(&self.contestant_preference, Role::Contestant, name, SlotKind::Preferred)?;
            }
        }

        Ok(())
    }

    /// Splits every person's slots into disjoint available and preferred sets.
    /// The problem itself is left untouched.
    pub fn normalized(&self) -> NormalizedAvailability {
        let hosts = self
            .hosts
            .iter()
            .map(|host| {
                let availability = Availability::from_sets(
                    self.host_availability.get(host),
                    self.host_preference.get(host),
                );
                (host.clone(), availability)
            })
            .collect();

        let contestants = self
            .contestants
            .iter()
            .map(|contestant| {
                let availability = Availability::from_sets(
                    self.contestant_availability.get(contestant),
                    self.contestant_preference.get(contestant),
                );
                (contestant.clone(), availability)
            })
            .collect();

        NormalizedAvailability { hosts, contestants }
    }
}
