use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{Graph, Node, NodeId, WayId};

/// Route found by a search: nodes from start to goal inclusive plus the way
/// traversed by each hop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub nodes: Vec<NodeId>,
    pub ways: Vec<WayId>,
    pub way_names: Vec<String>,
    /// Cost of each hop; parallel to `ways`.
    pub hop_costs: Vec<f64>,
    pub total_cost: f64,
}

impl Route {
    fn trivial(node: NodeId) -> Self {
        Self {
            nodes: vec![node],
            ways: Vec::new(),
            way_names: Vec::new(),
            hop_costs: Vec::new(),
            total_cost: 0.0,
        }
    }
}

/// Result of a search: either a route or proof that none exists.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Found(Route),
    Unreachable,
}

impl RouteOutcome {
    pub fn is_unreachable(&self) -> bool {
        matches!(self, RouteOutcome::Unreachable)
    }

    pub fn route(&self) -> Option<&Route> {
        match self {
            RouteOutcome::Found(route) => Some(route),
            RouteOutcome::Unreachable => None,
        }
    }

    pub fn into_route(self) -> Option<Route> {
        match self {
            RouteOutcome::Found(route) => Some(route),
            RouteOutcome::Unreachable => None,
        }
    }
}

/// Find the lowest-cost route between `start` and `goal` using A*.
pub fn find_route(graph: &Graph, start: NodeId, goal: NodeId) -> Result<RouteOutcome> {
    find_route_a_star(graph, start, goal)
}

/// Run A* with the straight-line horizontal distance to the goal as the
/// heuristic.
///
/// Distances use the graph's own cost model. Every edge costs at least its
/// horizontal distance under that model, so the heuristic is admissible and
/// consistent and the returned route is optimal.
pub fn find_route_a_star(graph: &Graph, start: NodeId, goal: NodeId) -> Result<RouteOutcome> {
    let goal_position = endpoint(graph, goal)?.position;
    endpoint(graph, start)?;
    let cost = graph.cost_model();

    search(graph, start, goal, |node| {
        graph
            .node(node)
            .map(|n| cost.horizontal_distance(n.position, goal_position))
            .unwrap_or(0.0)
    })
}

/// Run Dijkstra's algorithm (A* with a zero heuristic).
pub fn find_route_dijkstra(graph: &Graph, start: NodeId, goal: NodeId) -> Result<RouteOutcome> {
    endpoint(graph, goal)?;
    endpoint(graph, start)?;
    search(graph, start, goal, |_| 0.0)
}

fn endpoint(graph: &Graph, id: NodeId) -> Result<&Node> {
    graph.node(id).ok_or(Error::UnknownNode { id })
}

fn search<H>(graph: &Graph, start: NodeId, goal: NodeId, heuristic: H) -> Result<RouteOutcome>
where
    H: Fn(NodeId) -> f64,
{
    if start == goal {
        return Ok(RouteOutcome::Found(Route::trivial(start)));
    }

    let mut g_score: HashMap<NodeId, f64> = HashMap::new();
    let mut parents: HashMap<NodeId, Hop> = HashMap::new();
    let mut settled: HashSet<NodeId> = HashSet::new();
    let mut queue = BinaryHeap::new();
    let mut sequence = 0u64;

    g_score.insert(start, 0.0);
    queue.push(FrontierEntry::new(start, 0.0, heuristic(start), sequence));

    while let Some(entry) = queue.pop() {
        if settled.contains(&entry.node) {
            continue;
        }
        let current_score = match g_score.get(&entry.node) {
            Some(score) if *score < entry.cost.0 => continue,
            Some(score) => *score,
            None => continue,
        };
        settled.insert(entry.node);

        if entry.node == goal {
            debug!(
                start,
                goal,
                settled = settled.len(),
                cost = current_score,
                "route found"
            );
            return Ok(RouteOutcome::Found(reconstruct_route(
                graph,
                &parents,
                start,
                goal,
                current_score,
            )));
        }

        for edge in graph.neighbours(entry.node) {
            let next = edge.target;
            if settled.contains(&next) {
                continue;
            }

            let tentative = current_score + edge.cost;
            if tentative < *g_score.get(&next).unwrap_or(&f64::INFINITY) {
                g_score.insert(next, tentative);
                parents.insert(
                    next,
                    Hop {
                        previous: entry.node,
                        way: edge.way,
                        cost: edge.cost,
                    },
                );
                sequence += 1;
                queue.push(FrontierEntry::new(next, tentative, heuristic(next), sequence));
            }
        }
    }

    debug!(start, goal, settled = settled.len(), "frontier exhausted");
    Ok(RouteOutcome::Unreachable)
}

#[derive(Debug, Clone, Copy)]
struct Hop {
    previous: NodeId,
    way: WayId,
    cost: f64,
}

fn reconstruct_route(
    graph: &Graph,
    parents: &HashMap<NodeId, Hop>,
    start: NodeId,
    goal: NodeId,
    total_cost: f64,
) -> Route {
    let mut nodes = vec![goal];
    let mut ways = Vec::new();
    let mut hop_costs = Vec::new();

    let mut current = goal;
    while current != start {
        let Some(hop) = parents.get(&current) else {
            break;
        };
        ways.push(hop.way);
        hop_costs.push(hop.cost);
        nodes.push(hop.previous);
        current = hop.previous;
    }

    nodes.reverse();
    ways.reverse();
    hop_costs.reverse();

    let way_names = ways
        .iter()
        .map(|way| graph.way_name(*way).to_string())
        .collect();

    Route {
        nodes,
        ways,
        way_names,
        hop_costs,
        total_cost,
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct FrontierEntry {
    node: NodeId,
    cost: FloatOrd,
    estimate: FloatOrd,
    sequence: u64,
}

impl FrontierEntry {
    fn new(node: NodeId, cost: f64, heuristic: f64, sequence: u64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            estimate: FloatOrd(cost + heuristic),
            sequence,
        }
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap pops the lowest estimate, and the
        // earliest push among equal estimates.
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
