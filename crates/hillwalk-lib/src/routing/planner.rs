//! Route planning strategies.
//!
//! The `RoutePlanner` trait lets `plan_route` dispatch to A* or Dijkstra
//! without knowing which one it runs.

use crate::error::Result;
use crate::graph::{Graph, NodeId};
use crate::path::{find_route_a_star, find_route_dijkstra, RouteOutcome};

use super::RouteAlgorithm;

/// Trait for route planning strategies.
///
/// Planners hold no per-search state, so one instance can serve concurrent
/// read-only searches over the same graph.
pub trait RoutePlanner: Send + Sync {
    /// The algorithm identifier for this planner.
    fn algorithm(&self) -> RouteAlgorithm;

    /// Search `graph` for the lowest-cost route from `start` to `goal`.
    ///
    /// Fails only when an endpoint is not in the graph; a missing connection
    /// is reported as [`RouteOutcome::Unreachable`].
    fn find_path(&self, graph: &Graph, start: NodeId, goal: NodeId) -> Result<RouteOutcome>;
}

/// A* planner guided by the horizontal distance to the goal, measured with
/// the graph's cost model.
#[derive(Debug, Clone, Default)]
pub struct AStarPlanner;

impl RoutePlanner for AStarPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::AStar
    }

    fn find_path(&self, graph: &Graph, start: NodeId, goal: NodeId) -> Result<RouteOutcome> {
        find_route_a_star(graph, start, goal)
    }
}

/// Dijkstra planner; explores more nodes than A* but needs no heuristic.
#[derive(Debug, Clone, Default)]
pub struct DijkstraPlanner;

impl RoutePlanner for DijkstraPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Dijkstra
    }

    fn find_path(&self, graph: &Graph, start: NodeId, goal: NodeId) -> Result<RouteOutcome> {
        find_route_dijkstra(graph, start, goal)
    }
}

/// Select the planner for an algorithm.
pub fn select_planner(algorithm: RouteAlgorithm) -> Box<dyn RoutePlanner> {
    match algorithm {
        RouteAlgorithm::AStar => Box::new(AStarPlanner),
        RouteAlgorithm::Dijkstra => Box::new(DijkstraPlanner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn astar_planner_returns_correct_algorithm() {
        assert_eq!(AStarPlanner.algorithm(), RouteAlgorithm::AStar);
    }

    #[test]
    fn dijkstra_planner_returns_correct_algorithm() {
        assert_eq!(DijkstraPlanner.algorithm(), RouteAlgorithm::Dijkstra);
    }

    #[test]
    fn select_planner_chooses_correct_type() {
        for algorithm in [RouteAlgorithm::AStar, RouteAlgorithm::Dijkstra] {
            assert_eq!(select_planner(algorithm).algorithm(), algorithm);
        }
    }
}
