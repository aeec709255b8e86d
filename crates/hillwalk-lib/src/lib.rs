//! hillwalk library entry points.
//!
//! This crate decodes elevation rasters and map entities, builds a directed
//! walking graph whose edge costs account for elevation gain and stairs, and
//! plans lowest-cost routes over it with A*. Hosts (the CLI, renderers)
//! should only depend on the functions exported here instead of
//! reimplementing behavior.

#![deny(warnings)]

pub mod builder;
pub mod cost;
pub mod elevation;
pub mod entity;
pub mod error;
pub mod graph;
pub mod path;
pub mod routing;
pub mod spatial;

pub use builder::{build_graph, BuildOptions, BuildReport, GraphBuilder};
pub use cost::{estimated_minutes, CostModel, METERS_PER_DEGREE_LAT};
pub use elevation::{
    grid_cell, Bound, BoundingBox, ElevationGrid, GridCell, OutOfBounds, FALLBACK_ELEVATION,
};
pub use entity::{load_entities, parse_entities, MapEntity, PointEntity, WayEntity, WayTags};
pub use error::{Error, Result};
pub use graph::{Edge, GeoPoint, Graph, Node, NodeId, Way, WayId, WayKind};
pub use path::{find_route, find_route_a_star, find_route_dijkstra, Route, RouteOutcome};
pub use routing::{
    plan_route, PlanOutcome, RouteAlgorithm, RouteEndpoint, RouteLeg, RoutePlan, RouteRequest,
};
pub use spatial::NodeIndex;
