//! KD-tree index for snapping coordinates to the nearest graph node.
//!
//! Node positions are projected to local planar meters with the graph's
//! cost model, so squared Euclidean distance in the tree matches the
//! horizontal distance used for edge costs.

use std::collections::HashSet;
use std::fmt;

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use tracing::{debug, info};

use crate::cost::CostModel;
use crate::graph::{GeoPoint, Graph, NodeId};

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

/// Nearest-node lookup over a built graph.
pub struct NodeIndex {
    tree: KdTree<f64, usize, 2, BUCKET_SIZE, u32>,
    ids: Vec<NodeId>,
    cost: CostModel,
}

impl fmt::Debug for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeIndex")
            .field("len", &self.ids.len())
            .field("cost", &self.cost)
            .finish()
    }
}

impl NodeIndex {
    /// Index every node of `graph`.
    ///
    /// Nodes sharing a position collapse to the one with the lowest id, which
    /// is the node `nearest` reports for that spot.
    pub fn build(graph: &Graph) -> Self {
        let cost = *graph.cost_model();
        let mut nodes: Vec<(NodeId, GeoPoint)> =
            graph.nodes().map(|node| (node.id, node.position)).collect();
        // Stable insertion order keeps ties between equidistant nodes deterministic.
        nodes.sort_by_key(|(id, _)| *id);

        let mut tree: KdTree<f64, usize, 2, BUCKET_SIZE, u32> = KdTree::new();
        let mut ids = Vec::with_capacity(nodes.len());
        let mut occupied = HashSet::with_capacity(nodes.len());
        for (id, position) in nodes {
            let point = cost.project(position);
            if !occupied.insert(position_key(point)) {
                debug!(node = id, "node shares a position with a lower id; not indexed");
                continue;
            }
            tree.add(&point, ids.len());
            ids.push(id);
        }

        info!(node_count = ids.len(), "built node index");

        Self { tree, ids, cost }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Closest node to a coordinate and its horizontal distance in meters.
    pub fn nearest(&self, lat: f64, lon: f64) -> Option<(NodeId, f64)> {
        if self.ids.is_empty() {
            return None;
        }
        let query = self.cost.project(GeoPoint::new(lat, lon));
        let neighbour = self.tree.nearest_one::<SquaredEuclidean>(&query);
        Some((self.ids[neighbour.item], neighbour.distance.sqrt()))
    }
}

/// Bit pattern of a projected point; `+ 0.0` folds negative zero into zero.
fn position_key(point: [f64; 2]) -> [u64; 2] {
    [(point[0] + 0.0).to_bits(), (point[1] + 0.0).to_bits()]
}
