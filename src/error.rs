use std::fmt;
use thiserror::Error;

/// Whose availability a record or error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Host,
    Contestant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Host => write!(f, "host"),
            Role::Contestant => write!(f, "contestant"),
        }
    }
}

/// Which of the two timeslot sets a person carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Available,
    Preferred,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Available => write!(f, "availability"),
            SlotKind::Preferred => write!(f, "preference"),
        }
    }
}

/// Configuration and input errors. An instance where nothing fits is not an
/// error: it produces a schedule with every match left unscheduled.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("no {kind} data for {role} '{name}'")]
    MissingAvailability {
        role: Role,
        name: String,
        kind: SlotKind,
    },

    #[error("match {first} vs {second} refers to unknown contestant '{name}'")]
    UnknownContestant {
        first: String,
        second: String,
        name: String,
    },

    #[error("{kind} record for undeclared {role} '{name}'")]
    UndeclaredPerson {
        role: Role,
        name: String,
        kind: SlotKind,
    },

    #[error("invalid match: {0}")]
    InvalidMatch(String),

    #[error("invalid record on line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
