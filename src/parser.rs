use std::fs;
use std::path::Path;

use csv::Reader;
use serde::{Serialize, Deserialize};

use crate::error::{Role, ScheduleError, SlotKind};
use crate::schedule::{Match, ScheduleProblem, SlotSets, Timeslot};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub contestant1: String,
    pub contestant2: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostSlotRecord {
    pub host: String,
    pub day: String,
    pub session: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestantSlotRecord {
    pub contestant: String,
    pub day: String,
    pub session: String,
}

/// On-disk layout of a problem instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemFile {
    pub max_parallel: u32,
    pub days: Vec<String>,
    pub sessions: Vec<String>,
    pub contestants: Vec<String>,
    pub hosts: Vec<String>,
    pub matches: Vec<MatchRecord>,
    #[serde(default)]
    pub hosts_availability: Vec<HostSlotRecord>,
    #[serde(default)]
    pub hosts_preference: Vec<HostSlotRecord>,
    #[serde(default)]
    pub contestants_availability: Vec<ContestantSlotRecord>,
    #[serde(default)]
    pub contestants_preference: Vec<ContestantSlotRecord>,
}

/// One row of an availability CSV: `role,name,day,session,kind`
#[derive(Debug, Clone, Deserialize)]
struct AvailabilityRow {
    role: String,
    name: String,
    day: String,
    session: String,
    kind: String,
}

/// Where a slot record goes once its role and kind are known
fn target_sets(problem: &mut ScheduleProblem, role: Role, kind: SlotKind) -> (&mut SlotSets, &mut SlotSets) {
    match (role, kind) {
        (Role::Host, SlotKind::Available) => (&mut problem.host_availability, &mut problem.host_preference),
        (Role::Host, SlotKind::Preferred) => (&mut problem.host_preference, &mut problem.host_availability),
        (Role::Contestant, SlotKind::Available) => (&mut problem.contestant_availability, &mut problem.contestant_preference),
        (Role::Contestant, SlotKind::Preferred) => (&mut problem.contestant_preference, &mut problem.contestant_availability),
    }
}

fn is_declared(problem: &ScheduleProblem, role: Role, name: &str) -> bool {
    let names = match role {
        Role::Host => &problem.hosts,
        Role::Contestant => &problem.contestants,
    };
    names.iter().any(|declared| declared == name)
}

/// Adds one slot record for a declared person.
///
/// A person with at least one record of either kind gets both sets, so
/// "prefers nothing" can be expressed by listing availability only. A person
/// with no records at all stays absent and fails validation.
fn add_slot(
    problem: &mut ScheduleProblem,
    role: Role,
    kind: SlotKind,
    name: &str,
    day: &str,
    session: &str,
) -> Result<(), ScheduleError> {
    if !is_declared(problem, role, name) {
        return Err(ScheduleError::UndeclaredPerson {
            role,
            name: name.to_string(),
            kind,
        });
    }
    let (sets, counterpart) = target_sets(problem, role, kind);
    sets.entry(name.to_string())
        .or_default()
        .insert(Timeslot::new(day, session));
    counterpart.entry(name.to_string()).or_default();
    Ok(())
}

impl ProblemFile {
    pub fn into_problem(self) -> Result<ScheduleProblem, ScheduleError> {
        let mut problem = ScheduleProblem {
            max_parallel: self.max_parallel,
            days: self.days,
            sessions: self.sessions,
            hosts: self.hosts,
            contestants: self.contestants,
            matches: self
                .matches
                .into_iter()
                .map(|m| Match::new(m.contestant1, m.contestant2))
                .collect(),
            ..Default::default()
        };

        for record in &self.hosts_availability {
            add_slot(&mut problem, Role::Host, SlotKind::Available, &record.host, &record.day, &record.session)?;
        }
        for record in &self.hosts_preference {
            add_slot(&mut problem, Role::Host, SlotKind::Preferred, &record.host, &record.day, &record.session)?;
        }
        for record in &self.contestants_availability {
            add_slot(&mut problem, Role::Contestant, SlotKind::Available, &record.contestant, &record.day, &record.session)?;
        }
        for record in &self.contestants_preference {
            add_slot(&mut problem, Role::Contestant, SlotKind::Preferred, &record.contestant, &record.day, &record.session)?;
        }

        Ok(problem)
    }
}

/// Parses a problem instance from JSON text
pub fn parse_problem(json: &str) -> Result<ScheduleProblem, ScheduleError> {
    let file: ProblemFile = serde_json::from_str(json)?;
    file.into_problem()
}

/// Loads a problem instance from a JSON file
pub fn load_problem<P: AsRef<Path>>(path: P) -> Result<ScheduleProblem, ScheduleError> {
    let raw = fs::read_to_string(path)?;
    parse_problem(&raw)
}

fn parse_role(value: &str) -> Option<Role> {
    match value.trim().to_lowercase().as_str() {
        "host" => Some(Role::Host),
        "contestant" => Some(Role::Contestant),
        _ => None,
    }
}

fn parse_kind(value: &str) -> Option<SlotKind> {
    match value.trim().to_lowercase().as_str() {
        "available" | "availability" => Some(SlotKind::Available),
        "preferred" | "preference" => Some(SlotKind::Preferred),
        _ => None,
    }
}

/// Merges availability rows from CSV text into `problem`.
/// Returns the number of rows read.
pub fn merge_availability_csv<R: std::io::Read>(
    reader: R,
    problem: &mut ScheduleProblem,
) -> Result<usize, ScheduleError> {
    let mut reader = Reader::from_reader(reader);
    let mut rows = 0;

    for result in reader.deserialize() {
        let row: AvailabilityRow = result?;
        // header is line 1
        let line = rows as u64 + 2;
        let role = parse_role(&row.role).ok_or_else(|| ScheduleError::InvalidRecord {
            line,
            reason: format!("unknown role '{}'", row.role),
        })?;
        let kind = parse_kind(&row.kind).ok_or_else(|| ScheduleError::InvalidRecord {
            line,
            reason: format!("unknown kind '{}'", row.kind),
        })?;

        add_slot(problem, role, kind, row.name.trim(), row.day.trim(), row.session.trim()).map_err(|e| {
            ScheduleError::InvalidRecord {
                line,
                reason: e.to_string(),
            }
        })?;
        rows += 1;
    }

    Ok(rows)
}

/// Loads an availability CSV file and merges it into `problem`
pub fn load_availability_csv<P: AsRef<Path>>(
    csv_path: P,
    problem: &mut ScheduleProblem,
) -> Result<usize, ScheduleError> {
    let file = fs::File::open(csv_path)?;
    merge_availability_csv(file, problem)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "max_parallel": 2,
        "days": ["mon", "tue"],
        "sessions": ["am", "pm"],
        "contestants": ["ann", "bob", "cy"],
        "hosts": ["host"],
        "matches": [{"contestant1": "ann", "contestant2": "bob"}],
        "hosts_availability": [
            {"host": "host", "day": "mon", "session": "am"},
            {"host": "host", "day": "tue", "session": "pm"}
        ],
        "hosts_preference": [{"host": "host", "day": "tue", "session": "pm"}],
        "contestants_availability": [{"contestant": "ann", "day": "mon", "session": "am"}],
        "contestants_preference": [{"contestant": "bob", "day": "mon", "session": "am"}]
    }"#;

    #[test]
    fn test_parse_problem() {
        let problem = parse_problem(SAMPLE).unwrap();
        assert_eq!(problem.max_parallel, 2);
        assert_eq!(problem.days, vec!["mon", "tue"]);
        assert_eq!(problem.matches, vec![Match::new("ann", "bob")]);
        assert_eq!(problem.host_availability["host"].len(), 2);
        assert!(problem.host_preference["host"].contains(&Timeslot::new("tue", "pm")));
        // one record of either kind gives a person both sets
        assert!(problem.contestant_availability["bob"].is_empty());
        assert!(problem.contestant_preference["ann"].is_empty());
        // cy has no records and plays no match
        assert!(!problem.contestant_availability.contains_key("cy"));
        assert!(problem.validate().is_ok());
    }

    #[test]
    fn test_match_contestant_without_records_fails_validation() {
        let json = SAMPLE.replace(
            r#""matches": [{"contestant1": "ann", "contestant2": "bob"}]"#,
            r#""matches": [{"contestant1": "ann", "contestant2": "cy"}]"#,
        );
        let problem = parse_problem(&json).unwrap();
        match problem.validate() {
            Err(ScheduleError::MissingAvailability { role, name, kind }) => {
                assert_eq!(role, Role::Contestant);
                assert_eq!(name, "cy");
                assert_eq!(kind, SlotKind::Available);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_record_for_undeclared_person_is_rejected() {
        let json = SAMPLE.replace(
            r#"{"contestant": "bob", "day": "mon", "session": "am"}"#,
            r#"{"contestant": "dan", "day": "mon", "session": "am"}"#,
        );
        match parse_problem(&json) {
            Err(ScheduleError::UndeclaredPerson { role, name, kind }) => {
                assert_eq!(role, Role::Contestant);
                assert_eq!(name, "dan");
                assert_eq!(kind, SlotKind::Preferred);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_parse_problem_rejects_bad_json() {
        assert!(matches!(parse_problem("{\"days\": 3}"), Err(ScheduleError::Json(_))));
    }

    #[test]
    fn test_undeclared_person_stays_missing() {
        let mut problem = parse_problem(SAMPLE).unwrap();
        problem.matches.push(Match::new("ann", "dan"));
        assert!(matches!(problem.validate(), Err(ScheduleError::UnknownContestant { .. })));
    }

    #[test]
    fn test_merge_availability_csv() {
        let mut problem = parse_problem(SAMPLE).unwrap();
        let csv = "role,name,day,session,kind\n\
                   contestant,bob,tue,pm,available\n\
                   Host,host,mon,am,Preferred\n\
                   contestant,cy,mon,pm,preferred\n";
        let rows = merge_availability_csv(csv.as_bytes(), &mut problem).unwrap();
        assert_eq!(rows, 3);
        assert!(problem.contestant_availability["bob"].contains(&Timeslot::new("tue", "pm")));
        assert!(problem.host_preference["host"].contains(&Timeslot::new("mon", "am")));
        assert!(problem.contestant_preference["cy"].contains(&Timeslot::new("mon", "pm")));
        assert!(problem.contestant_availability["cy"].is_empty());
    }

    #[test]
    fn test_merge_availability_csv_rejects_undeclared_name() {
        let mut problem = parse_problem(SAMPLE).unwrap();
        let csv = "role,name,day,session,kind\n\
                   contestant,bob,tue,pm,available\n\
                   contestant,dan,mon,pm,preferred\n";
        match merge_availability_csv(csv.as_bytes(), &mut problem) {
            Err(ScheduleError::InvalidRecord { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("undeclared contestant 'dan'"));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_merge_availability_csv_rejects_unknown_role() {
        let mut problem = parse_problem(SAMPLE).unwrap();
        let csv = "role,name,day,session,kind\nreferee,zed,mon,am,available\n";
        match merge_availability_csv(csv.as_bytes(), &mut problem) {
            Err(ScheduleError::InvalidRecord { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_load_problem_from_file() {
        let path = std::env::temp_dir().join(format!("match-scheduler-parser-{}.json", std::process::id()));
        fs::write(&path, SAMPLE).unwrap();
        let problem = load_problem(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(problem.hosts, vec!["host"]);

        assert!(matches!(load_problem(&path), Err(ScheduleError::Io(_))));
    }
}
