use std::path::PathBuf;

use thiserror::Error;

use crate::graph::{NodeId, WayId};

/// Convenient result alias for the hillwalk library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when an elevation raster does not hold a non-empty square grid.
    #[error("elevation grid must be a non-empty square; got {samples} samples")]
    InvalidElevationGrid { samples: usize },

    /// Raised when an SRTM tile name does not encode a southwest corner.
    #[error("cannot derive tile bounds from {path}; expected a name like N43W079.hgt")]
    InvalidTileName { path: PathBuf },

    /// Raised when a way entity cannot produce edges.
    #[error("malformed way {way}: {reason}")]
    MalformedWay { way: WayId, reason: String },

    /// Raised when two point entities share an identifier.
    #[error("duplicate node identifier {id}")]
    DuplicateNode { id: NodeId },

    /// Raised when a planning endpoint is not part of the graph.
    #[error("unknown node identifier: {id}")]
    UnknownNode { id: NodeId },

    /// Raised when a cost model would break the planner's heuristic.
    #[error("invalid cost model: {message}")]
    InvalidCostModel { message: String },

    /// Raised when the graph holds no nodes to snap a coordinate onto.
    #[error("graph has no nodes near ({lat}, {lon})")]
    NoNearbyNode { lat: f64, lon: f64 },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Raised when a map-entity document fails to decode.
    #[error("failed to decode map entities: {0}")]
    EntityDecode(#[from] serde_json::Error),
}
