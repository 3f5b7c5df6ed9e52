use std::cmp::Reverse;
use std::collections::VecDeque;

pub type NodeId = usize;
pub type EdgeId = usize;
pub type Capacity = i64;
pub type Cost = i64;

/// A directed arc of the flow network.
///
/// Every forward edge is stored next to its residual twin. The twin starts
/// with `flow == capacity`, so it has nothing to give back until the forward
/// edge carries flow.
#[derive(Debug, Clone)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub capacity: Capacity,
    pub cost: Cost,
    pub flow: Capacity,
    pub twin: EdgeId,
}

impl Edge {
    pub fn residual_capacity(&self) -> Capacity {
        self.capacity - self.flow
    }

    pub fn is_valid(&self) -> bool {
        self.flow >= 0 && self.flow <= self.capacity
    }
}

/// Path found by one shortest-path search, listed from the sink back
struct AugmentingPath {
    bottleneck: Capacity,
    edges: Vec<EdgeId>,
}

/// Min-cost max-flow network over dense node ids `0..node_count`.
///
/// A network is single-use: after `min_cost_max_flow` has run, the final
/// flows can be read but the network cannot be solved again.
#[derive(Debug, Clone)]
pub struct FlowNetwork {
    adjacency: Vec<Vec<EdgeId>>,
    edges: Vec<Edge>,
    // Total flow pushed into each node so far, used to order adjacency lists
    incoming_flow: Vec<Capacity>,
    solved: bool,
}

impl FlowNetwork {
    pub fn new(node_count: usize) -> Self {
        FlowNetwork {
            adjacency: vec![Vec::new(); node_count],
            edges: Vec::new(),
            incoming_flow: vec![0; node_count],
            solved: false,
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    /// Iterates over the forward edges together with their ids, in insertion order
    #[cfg(test)]
    pub fn forward_edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges.iter().enumerate().step_by(2)
    }

    /// Adds the edge `from -> to` and its residual twin, returning the forward edge id
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, capacity: Capacity, cost: Cost) -> EdgeId {
        assert!(from < self.node_count(), "edge tail {} out of range", from);
        assert!(to < self.node_count(), "edge head {} out of range", to);
        assert!(capacity >= 0, "negative capacity {} on edge {} -> {}", capacity, from, to);
        assert!(cost >= 0, "negative cost {} on edge {} -> {}", cost, from, to);
        assert!(!self.solved, "cannot add edges to a solved network");

        let forward_id = self.edges.len();
        let backward_id = forward_id + 1;
        self.edges.push(Edge {
            from,
            to,
            capacity,
            cost,
            flow: 0,
            twin: backward_id,
        });
        self.edges.push(Edge {
            from: to,
            to: from,
            capacity,
            cost: -cost,
            flow: capacity,
            twin: forward_id,
        });
        self.adjacency[from].push(forward_id);
        self.adjacency[to].push(backward_id);
        forward_id
    }

    /// Pushes `amount` units over an edge and returns the cost incurred
    fn push_flow(&mut self, id: EdgeId, amount: Capacity) -> Cost {
        let twin = self.edges[id].twin;
        self.edges[id].flow += amount;
        self.edges[twin].flow -= amount;
        debug_assert!(self.edges[id].is_valid());
        debug_assert!(self.edges[twin].is_valid());
        debug_assert_eq!(
            self.edges[id].flow + self.edges[twin].flow,
            self.edges[id].capacity,
            "residual symmetry broken on edge {}",
            id
        );
        amount * self.edges[id].cost
    }

    /// Orders every adjacency list by the flow its heads have received so far,
    /// busiest first. The sort is stable, so untouched lists keep insertion order.
    fn sort_adjacency(&mut self) {
        let edges = &self.edges;
        let incoming_flow = &self.incoming_flow;
        for list in self.adjacency.iter_mut() {
            list.sort_by_key(|&id| Reverse(incoming_flow[edges[id].to]));
        }
    }

    /// Label-correcting search from `source` over edges with residual capacity.
    ///
    /// Nodes are processed from a FIFO queue and re-queued whenever their
    /// label improves, so the search ends only when no label can improve.
    /// Residual costs may be negative, but successive shortest paths never
    /// leave a negative cycle behind when every forward cost is non-negative.
    fn shortest_path(&self, source: NodeId, sink: NodeId) -> Option<AugmentingPath> {
        let n = self.node_count();
        let mut distance: Vec<Option<Cost>> = vec![None; n];
        let mut parent: Vec<Option<EdgeId>> = vec![None; n];
        let mut in_queue = vec![false; n];
        let mut queue = VecDeque::with_capacity(n);

        distance[source] = Some(0);
        in_queue[source] = true;
        queue.push_back(source);

        while let Some(u) = queue.pop_front() {
            in_queue[u] = false;
            let Some(du) = distance[u] else { continue };
            for &id in &self.adjacency[u] {
                let edge = &self.edges[id];
                if edge.residual_capacity() <= 0 {
                    continue;
                }
                let candidate = du + edge.cost;
                if distance[edge.to].map_or(true, |dv| candidate < dv) {
                    distance[edge.to] = Some(candidate);
                    parent[edge.to] = Some(id);
                    if !in_queue[edge.to] {
                        in_queue[edge.to] = true;
                        queue.push_back(edge.to);
                    }
                }
            }
        }

        distance[sink]?;

        let mut edges = Vec::new();
        let mut bottleneck = Capacity::MAX;
        let mut node = sink;
        while node != source {
            let id = parent[node]?;
            let edge = &self.edges[id];
            bottleneck = bottleneck.min(edge.residual_capacity());
            edges.push(id);
            node = edge.from;
        }

        Some(AugmentingPath { bottleneck, edges })
    }

    /// Pushes `amount` along every edge of `edges`, returning the cost
    fn push_along(&mut self, edges: &[EdgeId], amount: Capacity) -> Cost {
        let mut cost = 0;
        for &id in edges {
            cost += self.push_flow(id, amount);
            let head = self.edges[id].to;
            self.incoming_flow[head] += amount;
        }
        cost
    }

    /// Computes the maximum flow from `source` to `sink` and its total cost,
    /// augmenting along cheapest residual paths until none is left.
    pub fn min_cost_max_flow(&mut self, source: NodeId, sink: NodeId) -> (Capacity, Cost) {
        assert!(!self.solved, "min_cost_max_flow called twice on the same network");
        assert!(source < self.node_count(), "source {} out of range", source);
        assert!(sink < self.node_count(), "sink {} out of range", sink);

        let mut max_flow: Capacity = 0;
        let mut min_cost: Cost = 0;
        let mut augmentations = 0usize;

        if source != sink {
            self.sort_adjacency();
            while let Some(path) = self.shortest_path(source, sink) {
                max_flow += path.bottleneck;
                min_cost += self.push_along(&path.edges, path.bottleneck);
                augmentations += 1;
                log::trace!(
                    "augmented {} unit(s) over {} edge(s)",
                    path.bottleneck,
                    path.edges.len()
                );
                self.sort_adjacency();
            }
        }

        self.solved = true;
        log::debug!(
            "min cost max flow on {} nodes / {} edges: flow {}, cost {}, {} augmentations",
            self.node_count(),
            self.edges.len() / 2,
            max_flow,
            min_cost,
            augmentations
        );
        (max_flow, min_cost)
    }
}
