use std::cmp::Ordering;
use std::fmt;
use serde::{Serialize, Deserialize};

/// A (day, session) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timeslot {
    pub day: String,
    pub session: String,
}

impl Timeslot {
    pub fn new(day: impl Into<String>, session: impl Into<String>) -> Self {
        Timeslot {
            day: day.into(),
            session: session.into(),
        }
    }
}

impl fmt::Display for Timeslot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.session)
    }
}

/// A pairing of two contestants. The order of the two names carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    pub first: String,
    pub second: String,
}

impl Match {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Match {
            first: first.into(),
            second: second.into(),
        }
    }

    pub fn contestants(&self) -> [&str; 2] {
        [&self.first, &self.second]
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.first, self.second)
    }
}

/// A host running a match in a given timeslot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchAssignment {
    pub host: String,
    pub timeslot: Timeslot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledMatch {
    pub pairing: Match,
    pub assignment: MatchAssignment,
}

/// Result of one (parallel, max_per_day) trial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Maximum number of matches sharing one timeslot
    pub parallel: u32,
    /// Maximum number of matches on one day
    pub max_per_day: u32,
    /// Sorted by day, then session, then host
    pub assignments: Vec<ScheduledMatch>,
    /// In input order
    pub unscheduled: Vec<Match>,
    /// Number of person-slot pairings (hosts included) that landed on a preferred timeslot
    pub preferred_count: u64,
}

impl Schedule {
    pub fn scheduled_count(&self) -> usize {
        self.assignments.len()
    }

    /// Orders two schedules by quality; `Greater` means `self` is the better one.
    ///
    /// Fewer unscheduled matches first, then more preferred pairings, then lower
    /// parallelism, then a lower per-day cap.
    pub fn quality_cmp(&self, other: &Schedule) -> Ordering {
        other
            .unscheduled
            .len()
            .cmp(&self.unscheduled.len())
            .then(self.preferred_count.cmp(&other.preferred_count))
            .then(other.parallel.cmp(&self.parallel))
            .then(other.max_per_day.cmp(&self.max_per_day))
    }

    pub fn is_better_than(&self, other: &Schedule) -> bool {
        self.quality_cmp(other) == Ordering::Greater
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(parallel: u32, max_per_day: u32, unscheduled: usize, preferred_count: u64) -> Schedule {
        Schedule {
            parallel,
            max_per_day,
            assignments: Vec::new(),
            unscheduled: (0..unscheduled).map(|i| Match::new(format!("a{}", i), format!("b{}", i))).collect(),
            preferred_count,
        }
    }

    #[test]
    fn test_fewer_unscheduled_wins_over_preferences() {
        let complete = schedule(3, 3, 0, 1);
        let partial = schedule(1, 1, 1, 20);
        assert!(complete.is_better_than(&partial));
        assert!(!partial.is_better_than(&complete));
    }

    #[test]
    fn test_preferred_count_breaks_ties() {
        let better = schedule(2, 2, 0, 9);
        let worse = schedule(1, 1, 0, 8);
        assert!(better.is_better_than(&worse));
    }

    #[test]
    fn test_lower_parallel_then_lower_day_cap() {
        let simple = schedule(1, 5, 0, 9);
        let wide = schedule(2, 1, 0, 9);
        assert!(simple.is_better_than(&wide));

        let tight = schedule(1, 2, 0, 9);
        assert!(tight.is_better_than(&simple));
    }

    #[test]
    fn test_equal_schedules_are_not_better() {
        let a = schedule(1, 2, 0, 9);
        let b = schedule(1, 2, 0, 9);
        assert_eq!(a.quality_cmp(&b), Ordering::Equal);
        assert!(!a.is_better_than(&b));
    }

    #[test]
    fn test_match_helpers() {
        let pairing = Match::new("alice", "bob");
        assert_eq!(pairing.contestants(), ["alice", "bob"]);
        assert_eq!(pairing.to_string(), "alice vs bob");
    }
}
