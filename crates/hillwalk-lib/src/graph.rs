use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::cost::CostModel;

/// Identifier of a point entity, and of the node built from it.
pub type NodeId = i64;

/// Identifier of a way entity.
pub type WayId = i64;

/// Geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Path type carried by a way's `highway` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum WayKind {
    /// Stairs (`highway=steps`); penalised by the cost model.
    Steps,
    /// Any other traversable path type, kept verbatim.
    Path(String),
}

impl WayKind {
    pub fn from_tag(value: &str) -> Self {
        match value {
            "steps" => WayKind::Steps,
            other => WayKind::Path(other.to_string()),
        }
    }

    pub fn is_steps(&self) -> bool {
        matches!(self, WayKind::Steps)
    }

    pub fn as_str(&self) -> &str {
        match self {
            WayKind::Steps => "steps",
            WayKind::Path(value) => value,
        }
    }
}

impl From<WayKind> for String {
    fn from(kind: WayKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for WayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directed, costed connection owned by its source node.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub target: NodeId,
    pub way: WayId,
    pub cost: f64,
}

/// Addressable point on the walking network.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub position: GeoPoint,
    /// Meters, sampled once from the elevation grid.
    pub elevation: i16,
    pub(crate) edges: Vec<Edge>,
    pub(crate) label: String,
}

impl Node {
    pub(crate) fn new(id: NodeId, position: GeoPoint, elevation: i16) -> Self {
        Self {
            id,
            position,
            elevation,
            edges: Vec::new(),
            label: String::new(),
        }
    }

    /// Outgoing edges.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Distinct names of the ways touching this node, sorted and space separated.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.label)
    }
}

/// Named, typed street or path. Its node list is kept for rendering only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Way {
    pub id: WayId,
    pub name: String,
    pub kind: WayKind,
    pub nodes: Vec<NodeId>,
}

/// Walking graph: nodes with their adjacency plus the ways edges belong to.
///
/// Built once by [`crate::builder::GraphBuilder`] and read-only afterwards, so
/// it can be shared across any number of planning calls. The graph keeps the
/// cost model its edge costs were computed with, so searches and spatial
/// lookups measure distance the same way.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: HashMap<NodeId, Node>,
    ways: HashMap<WayId, Way>,
    cost: CostModel,
}

impl Graph {
    pub(crate) fn from_parts(
        nodes: HashMap<NodeId, Node>,
        ways: HashMap<WayId, Way>,
        cost: CostModel,
    ) -> Self {
        Self { nodes, ways, cost }
    }

    /// Cost model the edge costs were computed with.
    pub fn cost_model(&self) -> &CostModel {
        &self.cost
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn way(&self, id: WayId) -> Option<&Way> {
        self.ways.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Return the outgoing edges of a node; unknown nodes have none.
    pub fn neighbours(&self, id: NodeId) -> &[Edge] {
        self.nodes
            .get(&id)
            .map(|node| node.edges.as_slice())
            .unwrap_or(&[])
    }

    /// Display name of a way, or `"unnamed"` when the id is unknown.
    pub fn way_name(&self, id: WayId) -> &str {
        self.ways
            .get(&id)
            .map(|way| way.name.as_str())
            .unwrap_or(crate::entity::UNNAMED_WAY)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn ways(&self) -> impl Iterator<Item = &Way> {
        self.ways.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn way_count(&self) -> usize {
        self.ways.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|node| node.edges.len()).sum()
    }
}
