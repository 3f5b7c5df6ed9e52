pub mod types;
pub mod slot_utils;
pub mod problem;
pub mod graph;
pub mod search;

pub use types::{Match, Schedule, Timeslot};
pub use slot_utils::{calculate_slot_popularity, timeslots};
pub use problem::{ScheduleProblem, SlotSets};
pub use search::find_best_schedule;
