use crate::error::ScheduleError;
use super::graph::generate_schedule;
use super::problem::ScheduleProblem;
use super::types::Schedule;

/// Tries every (parallel, max_per_day) combination and keeps the best schedule.
///
/// `parallel` runs over `1..=max_parallel` and `max_per_day` over
/// `1..=days * sessions` (at least one value, so an event without timeslots
/// still reports every match as unscheduled). On ties the first schedule found
/// is kept.
pub fn find_best_schedule(problem: &ScheduleProblem) -> Result<Schedule, ScheduleError> {
    problem.validate()?;
    let max_day_cap = u32::try_from(problem.timeslot_count().max(1)).map_err(|_| {
        ScheduleError::InvalidParameter(format!(
            "{} days x {} sessions is too many timeslots",
            problem.days.len(),
            problem.sessions.len()
        ))
    })?;
    let availability = problem.normalized();

    log::info!(
        "Searching {} x {} configurations for {} matches ({} hosts, {} timeslots)",
        problem.max_parallel,
        max_day_cap,
        problem.matches.len(),
        problem.hosts.len(),
        problem.timeslot_count()
    );

    let mut best: Option<Schedule> = None;
    for parallel in 1..=problem.max_parallel {
        for max_per_day in 1..=max_day_cap {
            let schedule = generate_schedule(problem, &availability, parallel, max_per_day);
            log::debug!(
                "parallel={} max_per_day={}: {} scheduled, {} unscheduled, preferred {}",
                parallel,
                max_per_day,
                schedule.scheduled_count(),
                schedule.unscheduled.len(),
                schedule.preferred_count
            );

            let improves = match &best {
                Some(current) => schedule.is_better_than(current),
                None => true,
            };
            if improves {
                best = Some(schedule);
            }
        }
    }

    let best = best.ok_or_else(|| ScheduleError::InvalidParameter("empty search space".to_string()))?;
    log::info!(
        "Best schedule: parallel={} max_per_day={}, {} scheduled, {} unscheduled, preferred {}",
        best.parallel,
        best.max_per_day,
        best.scheduled_count(),
        best.unscheduled.len(),
        best.preferred_count
    );
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Role, SlotKind};
    use crate::schedule::test_fixtures::{random_problem, reference_problem};
    use crate::schedule::types::{Match, Timeslot};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_reference_fixture_best_schedule() {
        let best = find_best_schedule(&reference_problem()).unwrap();
        assert!(best.unscheduled.is_empty());
        assert_eq!(best.preferred_count, 10);
        assert_eq!(best.parallel, 1);
        assert_eq!(best.max_per_day, 2);

        let placed: Vec<(String, String, Timeslot)> = best
            .assignments
            .iter()
            .map(|m| (m.pairing.to_string(), m.assignment.host.clone(), m.assignment.timeslot.clone()))
            .collect();
        assert_eq!(
            placed,
            vec![
                ("ethening vs benson1029".to_string(), "host2".to_string(), Timeslot::new("10/7", "Evening")),
                ("lckcode vs benson1029".to_string(), "host1".to_string(), Timeslot::new("11/7", "Night")),
                ("lckcode vs chengheichit".to_string(), "host1".to_string(), Timeslot::new("12/7", "Evening")),
                ("chengheichit vs ethening".to_string(), "host1".to_string(), Timeslot::new("12/7", "Night")),
            ]
        );
    }

    #[test]
    fn test_search_is_deterministic() {
        let problem = reference_problem();
        let first = find_best_schedule(&problem).unwrap();
        let second = find_best_schedule(&problem).unwrap();
        assert_eq!(first, second);

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..5 {
            let problem = random_problem(&mut rng);
            assert_eq!(find_best_schedule(&problem).unwrap(), find_best_schedule(&problem).unwrap());
        }
    }

    #[test]
    fn test_infeasible_match_stays_unscheduled() {
        let mut problem = reference_problem();
        problem.contestants.extend(["x".to_string(), "y".to_string()]);
        problem.matches.push(Match::new("x", "y"));
        problem.contestant_availability.insert("x".to_string(), [Timeslot::new("10/7", "Afternoon")].into_iter().collect());
        problem.contestant_preference.insert("x".to_string(), HashSet::new());
        problem.contestant_availability.insert("y".to_string(), [Timeslot::new("12/7", "Night")].into_iter().collect());
        problem.contestant_preference.insert("y".to_string(), HashSet::new());

        let best = find_best_schedule(&problem).unwrap();
        assert_eq!(best.unscheduled, vec![Match::new("x", "y")]);
        assert_eq!(best.preferred_count, 10);
        assert_eq!(best.scheduled_count(), 4);
    }

    #[test]
    fn test_no_timeslots_leaves_everything_unscheduled() {
        let mut problem = reference_problem();
        problem.sessions.clear();
        let best = find_best_schedule(&problem).unwrap();
        assert_eq!(best.unscheduled.len(), problem.matches.len());
        assert_eq!(best.preferred_count, 0);
        assert_eq!((best.parallel, best.max_per_day), (1, 1));
    }

    #[test]
    fn test_day_cap_beyond_u32_is_rejected() {
        let mut problem = reference_problem();
        problem.days = vec![String::new(); 70_000];
        problem.sessions = vec![String::new(); 70_000];
        assert!(matches!(find_best_schedule(&problem), Err(ScheduleError::InvalidParameter(_))));
    }

    #[test]
    fn test_missing_data_is_a_configuration_error() {
        let mut problem = reference_problem();
        problem.contestant_preference.remove("ethening");
        match find_best_schedule(&problem) {
            Err(ScheduleError::MissingAvailability { role, name, kind }) => {
                assert_eq!(role, Role::Contestant);
                assert_eq!(name, "ethening");
                assert_eq!(kind, SlotKind::Preferred);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_scheduled_count_is_monotone_in_both_parameters() {
        use crate::schedule::graph::generate_schedule;

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..40 {
            let problem = random_problem(&mut rng);
            let availability = problem.normalized();
            let caps = problem.timeslot_count() as u32;
            let grid: Vec<Vec<usize>> = (1..=problem.max_parallel)
                .map(|parallel| {
                    (1..=caps)
                        .map(|cap| generate_schedule(&problem, &availability, parallel, cap).scheduled_count())
                        .collect()
                })
                .collect();

            for row in &grid {
                assert!(row.windows(2).all(|w| w[0] <= w[1]), "day cap monotonicity {:?}", grid);
            }
            for rows in grid.windows(2) {
                assert!(rows[0].iter().zip(&rows[1]).all(|(a, b)| a <= b), "parallel monotonicity {:?}", grid);
            }
        }
    }

    #[test]
    fn test_best_schedule_dominates_every_trial() {
        use crate::schedule::graph::generate_schedule;

        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..10 {
            let problem = random_problem(&mut rng);
            let best = find_best_schedule(&problem).unwrap();
            let availability = problem.normalized();
            for parallel in 1..=problem.max_parallel {
                for cap in 1..=problem.timeslot_count() as u32 {
                    let trial = generate_schedule(&problem, &availability, parallel, cap);
                    assert!(!trial.is_better_than(&best));
                }
            }
        }
    }
}
