use crate::flow::{Capacity, Cost, EdgeId, FlowNetwork, NodeId};
use super::problem::{Availability, NormalizedAvailability, ScheduleProblem};
use super::slot_utils::timeslots;
use super::types::{MatchAssignment, Schedule, ScheduledMatch, Timeslot};

pub const SOURCE: NodeId = 0;
pub const SINK: NodeId = 1;

/// Dense node ids of the scheduling network.
///
/// Layout: source, sink, one node per match, one per (day, session, host),
/// one per (day, session), one per day.
#[derive(Debug, Clone, Copy)]
pub struct NodeLayout {
    matches: usize,
    days: usize,
    sessions: usize,
    hosts: usize,
}

impl NodeLayout {
    pub fn new(matches: usize, days: usize, sessions: usize, hosts: usize) -> Self {
        NodeLayout { matches, days, sessions, hosts }
    }

    pub fn match_node(&self, index: usize) -> NodeId {
        2 + index
    }

    pub fn assignment_node(&self, day: usize, session: usize, host: usize) -> NodeId {
        2 + self.matches + (day * self.sessions + session) * self.hosts + host
    }

    pub fn timeslot_node(&self, day: usize, session: usize) -> NodeId {
        2 + self.matches + self.days * self.sessions * self.hosts + day * self.sessions + session
    }

    pub fn day_node(&self, day: usize) -> NodeId {
        2 + self.matches + self.days * self.sessions * (self.hosts + 1) + day
    }

    pub fn node_count(&self) -> usize {
        self.day_node(self.days)
    }
}

/// How many of the two contestants prefer a timeslot both can attend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContestantTier {
    BothPreferred,
    OnePreferred,
    NonePreferred,
}

const CONTESTANT_TIERS: [ContestantTier; 3] = [
    ContestantTier::BothPreferred,
    ContestantTier::OnePreferred,
    ContestantTier::NonePreferred,
];

fn contestant_tier(a: &Availability, b: &Availability, timeslot: &Timeslot) -> Option<ContestantTier> {
    let (a_prefers, b_prefers) = (a.preferred.contains(timeslot), b.preferred.contains(timeslot));
    let (a_available, b_available) = (a.available.contains(timeslot), b.available.contains(timeslot));

    if a_prefers && b_prefers {
        Some(ContestantTier::BothPreferred)
    } else if (a_prefers && b_available) || (a_available && b_prefers) {
        Some(ContestantTier::OnePreferred)
    } else if a_available && b_available {
        Some(ContestantTier::NonePreferred)
    } else {
        None
    }
}

/// Edge cost of a candidate slot. Every person contributes a digit that is
/// `1` when the slot is preferred and `node_count` otherwise, so
/// `cost % node_count` is the number of people who prefer it.
fn tier_cost(host_prefers: bool, tier: ContestantTier, node_count: Cost) -> Cost {
    let host_digit = if host_prefers { 1 } else { node_count };
    let contestant_digits = match tier {
        ContestantTier::BothPreferred => 1 + 1,
        ContestantTier::OnePreferred => 1 + node_count,
        ContestantTier::NonePreferred => node_count + node_count,
    };
    host_digit + contestant_digits
}

/// A `match -> (host, day, session)` edge of the network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateEdge {
    pub match_index: usize,
    pub host_index: usize,
    pub day_index: usize,
    pub session_index: usize,
    pub edge: EdgeId,
}

/// The flow network of one (parallel, max_per_day) trial
pub struct ScheduleGraph {
    layout: NodeLayout,
    network: FlowNetwork,
    candidates: Vec<CandidateEdge>,
    parallel: u32,
    max_per_day: u32,
}

impl ScheduleGraph {
    pub fn build(
        problem: &ScheduleProblem,
        availability: &NormalizedAvailability,
        parallel: u32,
        max_per_day: u32,
    ) -> Self {
        let layout = NodeLayout::new(
            problem.matches.len(),
            problem.days.len(),
            problem.sessions.len(),
            problem.hosts.len(),
        );
        let node_count = layout.node_count();
        let mut network = FlowNetwork::new(node_count);
        let mut candidates = Vec::new();
        let sessions = problem.sessions.len().max(1);
        let slots: Vec<(usize, Timeslot)> = timeslots(&problem.days, &problem.sessions)
            .into_iter()
            .enumerate()
            .collect();

        for (match_index, pairing) in problem.matches.iter().enumerate() {
            let match_node = layout.match_node(match_index);
            network.add_edge(SOURCE, match_node, 1, 0);

            let (Some(first), Some(second)) = (
                availability.contestants.get(&pairing.first),
                availability.contestants.get(&pairing.second),
            ) else {
                continue;
            };

            for (host_index, host) in problem.hosts.iter().enumerate() {
                let Some(host_slots) = availability.hosts.get(host) else {
                    continue;
                };

                for (host_prefers, host_set) in [(true, &host_slots.preferred), (false, &host_slots.available)] {
                    for tier in CONTESTANT_TIERS {
                        let cost = tier_cost(host_prefers, tier, node_count as Cost);
                        for (slot_index, timeslot) in &slots {
                            if !host_set.contains(timeslot) || contestant_tier(first, second, timeslot) != Some(tier) {
                                continue;
                            }
                            let (day_index, session_index) = (slot_index / sessions, slot_index % sessions);
                            let target = layout.assignment_node(day_index, session_index, host_index);
                            let edge = network.add_edge(match_node, target, 1, cost);
                            candidates.push(CandidateEdge {
                                match_index,
                                host_index,
                                day_index,
                                session_index,
                                edge,
                            });
                        }
                    }
                }
            }
        }

        let parallel_capacity = Capacity::from(parallel);
        for day_index in 0..problem.days.len() {
            network.add_edge(layout.day_node(day_index), SINK, Capacity::from(max_per_day), 0);
            for session_index in 0..problem.sessions.len() {
                let timeslot_node = layout.timeslot_node(day_index, session_index);
                network.add_edge(timeslot_node, layout.day_node(day_index), parallel_capacity, 0);
                for host_index in 0..problem.hosts.len() {
                    network.add_edge(
                        layout.assignment_node(day_index, session_index, host_index),
                        timeslot_node,
                        parallel_capacity,
                        0,
                    );
                }
            }
        }

        ScheduleGraph {
            layout,
            network,
            candidates,
            parallel,
            max_per_day,
        }
    }

    #[cfg(test)]
    pub fn layout(&self) -> &NodeLayout {
        &self.layout
    }

    #[cfg(test)]
    pub fn network(&self) -> &FlowNetwork {
        &self.network
    }

    #[cfg(test)]
    pub fn candidates(&self) -> &[CandidateEdge] {
        &self.candidates
    }

    pub fn solve(&mut self) -> (Capacity, Cost) {
        self.network.min_cost_max_flow(SOURCE, SINK)
    }

    /// Reads the scheduled matches off the saturated candidate edges
    pub fn decode(&self, problem: &ScheduleProblem) -> Schedule {
        debug_assert!(self.network.is_solved());
        let node_count = self.layout.node_count() as Cost;
        let mut scheduled = vec![false; problem.matches.len()];
        let mut placed: Vec<(&CandidateEdge, ScheduledMatch)> = Vec::new();
        let mut preferred_count = 0u64;

        for candidate in &self.candidates {
            let edge = self.network.edge(candidate.edge);
            if edge.flow != 1 {
                continue;
            }
            preferred_count += (edge.cost % node_count) as u64;
            scheduled[candidate.match_index] = true;
            placed.push((
                candidate,
                ScheduledMatch {
                    pairing: problem.matches[candidate.match_index].clone(),
                    assignment: MatchAssignment {
                        host: problem.hosts[candidate.host_index].clone(),
                        timeslot: Timeslot::new(
                            problem.days[candidate.day_index].as_str(),
                            problem.sessions[candidate.session_index].as_str(),
                        ),
                    },
                },
            ));
        }

        placed.sort_by_key(|(c, _)| (c.day_index, c.session_index, c.host_index));

        let unscheduled = problem
            .matches
            .iter()
            .zip(&scheduled)
            .filter(|(_, &done)| !done)
            .map(|(pairing, _)| pairing.clone())
            .collect();

        Schedule {
            parallel: self.parallel,
            max_per_day: self.max_per_day,
            assignments: placed.into_iter().map(|(_, m)| m).collect(),
            unscheduled,
            preferred_count,
        }
    }
}

/// Builds, solves and decodes the network for one parameter combination
pub fn generate_schedule(
    problem: &ScheduleProblem,
    availability: &NormalizedAvailability,
    parallel: u32,
    max_per_day: u32,
) -> Schedule {
    let mut graph = ScheduleGraph::build(problem, availability, parallel, max_per_day);
    let (flow, cost) = graph.solve();
    log::trace!(
        "parallel={} max_per_day={}: flow {}, cost {}",
        parallel,
        max_per_day,
        flow,
        cost
    );
    graph.decode(problem)
}
