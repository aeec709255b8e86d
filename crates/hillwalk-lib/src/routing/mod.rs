//! Route planning module.
//!
//! This module provides:
//! - [`RouteAlgorithm`] - Supported routing algorithms (A*, Dijkstra)
//! - [`RouteEndpoint`] - A route endpoint given as a node id or a coordinate
//! - [`RouteRequest`] - High-level route planning request
//! - [`RoutePlan`] - Planned route with per-hop costs and leg summaries
//! - [`plan_route`] - Main entry point for computing routes
//!
//! # Strategy Pattern
//!
//! Each algorithm is encapsulated in a [`RoutePlanner`] implementation chosen
//! by [`select_planner`].
//!
//! # Example
//!
//! ```ignore
//! use hillwalk_lib::{build_graph, plan_route, BuildOptions, CostModel, PlanOutcome, RouteRequest};
//!
//! let (graph, _report) = build_graph(&grid, &entities, &CostModel::default(), BuildOptions::default())?;
//! match plan_route(&graph, &RouteRequest::nodes(1, 42))? {
//!     PlanOutcome::Found(plan) => println!("{:.0} m-equivalent", plan.total_cost),
//!     PlanOutcome::Unreachable => println!("no route"),
//! }
//! ```

mod planner;

pub use planner::{select_planner, AStarPlanner, DijkstraPlanner, RoutePlanner};

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::cost::estimated_minutes;
use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};
use crate::path::RouteOutcome;
use crate::spatial::NodeIndex;

/// Supported routing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteAlgorithm {
    /// Dijkstra's algorithm (no heuristic).
    Dijkstra,
    /// A* search guided by horizontal distance.
    #[default]
    #[serde(rename = "a-star")]
    AStar,
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::Dijkstra => "dijkstra",
            RouteAlgorithm::AStar => "a-star",
        };
        f.write_str(value)
    }
}

/// Where a route starts or ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RouteEndpoint {
    /// A node identifier that must exist in the graph.
    Node(NodeId),
    /// A coordinate snapped to the nearest node.
    Coordinate { lat: f64, lon: f64 },
}

impl fmt::Display for RouteEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteEndpoint::Node(id) => write!(f, "node {id}"),
            RouteEndpoint::Coordinate { lat, lon } => write!(f, "({lat}, {lon})"),
        }
    }
}

/// High-level route planning request.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub start: RouteEndpoint,
    pub goal: RouteEndpoint,
    pub algorithm: RouteAlgorithm,
    /// Pre-built node index used to snap coordinate endpoints.
    /// If `None`, the index is built on demand.
    pub node_index: Option<Arc<NodeIndex>>,
}

impl RouteRequest {
    /// A* request between two node identifiers.
    pub fn nodes(start: NodeId, goal: NodeId) -> Self {
        Self {
            start: RouteEndpoint::Node(start),
            goal: RouteEndpoint::Node(goal),
            algorithm: RouteAlgorithm::AStar,
            node_index: None,
        }
    }

    /// A* request between two coordinates.
    pub fn coordinates(start: (f64, f64), goal: (f64, f64)) -> Self {
        Self {
            start: RouteEndpoint::Coordinate {
                lat: start.0,
                lon: start.1,
            },
            goal: RouteEndpoint::Coordinate {
                lat: goal.0,
                lon: goal.1,
            },
            algorithm: RouteAlgorithm::AStar,
            node_index: None,
        }
    }

    pub fn with_algorithm(mut self, algorithm: RouteAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Attach a pre-built node index to the request.
    pub fn with_node_index(mut self, index: Arc<NodeIndex>) -> Self {
        self.node_index = Some(index);
        self
    }

    fn needs_index(&self) -> bool {
        matches!(self.start, RouteEndpoint::Coordinate { .. })
            || matches!(self.goal, RouteEndpoint::Coordinate { .. })
    }
}

/// Consecutive hops along ways sharing one name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteLeg {
    pub way_name: String,
    pub hops: usize,
    pub cost: f64,
}

/// Planned route returned by the library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub algorithm: RouteAlgorithm,
    pub start: NodeId,
    pub goal: NodeId,
    pub steps: Vec<NodeId>,
    /// Name of the way used by each hop; one shorter than `steps`.
    pub way_names: Vec<String>,
    pub hop_costs: Vec<f64>,
    pub total_cost: f64,
}

impl RoutePlan {
    /// Number of hops in the route.
    pub fn hop_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Walking time in minutes at 5 km/h on flat ground. Informational only.
    pub fn estimated_minutes(&self) -> f64 {
        estimated_minutes(self.total_cost)
    }

    /// Collapse consecutive hops on the same way name into legs.
    pub fn legs(&self) -> Vec<RouteLeg> {
        let mut legs: Vec<RouteLeg> = Vec::new();
        for (name, cost) in self.way_names.iter().zip(&self.hop_costs) {
            match legs.last_mut() {
                Some(leg) if leg.way_name == *name => {
                    leg.hops += 1;
                    leg.cost += cost;
                }
                _ => legs.push(RouteLeg {
                    way_name: name.clone(),
                    hops: 1,
                    cost: *cost,
                }),
            }
        }
        legs
    }
}

/// Result of [`plan_route`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    Found(RoutePlan),
    /// Start and goal lie in disconnected parts of the graph.
    Unreachable,
}

impl PlanOutcome {
    pub fn plan(&self) -> Option<&RoutePlan> {
        match self {
            PlanOutcome::Found(plan) => Some(plan),
            PlanOutcome::Unreachable => None,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn resolve_endpoint(
    graph: &Graph,
    index: Option<&NodeIndex>,
    endpoint: RouteEndpoint,
) -> Result<NodeId> {
    match endpoint {
        RouteEndpoint::Node(id) if graph.contains(id) => Ok(id),
        RouteEndpoint::Node(id) => Err(Error::UnknownNode { id }),
        RouteEndpoint::Coordinate { lat, lon } => {
            let (id, distance) = index
                .and_then(|index| index.nearest(lat, lon))
                .ok_or(Error::NoNearbyNode { lat, lon })?;
            debug!(lat, lon, node = id, distance, "snapped coordinate to node");
            Ok(id)
        }
    }
}

/// Compute a route using the requested algorithm.
///
/// Unknown endpoints are errors; a goal that cannot be reached is
/// [`PlanOutcome::Unreachable`].
pub fn plan_route(graph: &Graph, request: &RouteRequest) -> Result<PlanOutcome> {
    let built_index;
    let index = match (&request.node_index, request.needs_index()) {
        (Some(index), _) => Some(index.as_ref()),
        (None, true) => {
            debug!("no node index supplied; building one on demand");
            built_index = NodeIndex::build(graph);
            Some(&built_index)
        }
        (None, false) => None,
    };

    let start = resolve_endpoint(graph, index, request.start)?;
    let goal = resolve_endpoint(graph, index, request.goal)?;

    let planner = select_planner(request.algorithm);
    let outcome = planner.find_path(graph, start, goal)?;

    let route = match outcome {
        RouteOutcome::Found(route) => route,
        RouteOutcome::Unreachable => {
            info!(start, goal, algorithm = %request.algorithm, "goal unreachable");
            return Ok(PlanOutcome::Unreachable);
        }
    };

    info!(
        start,
        goal,
        algorithm = %request.algorithm,
        hops = route.ways.len(),
        total_cost = route.total_cost,
        "planned route"
    );

    Ok(PlanOutcome::Found(RoutePlan {
        algorithm: planner.algorithm(),
        start,
        goal,
        steps: route.nodes,
        way_names: route.way_names,
        hop_costs: route.hop_costs,
        total_cost: route.total_cost,
    }))
}
