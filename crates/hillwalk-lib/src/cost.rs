//! Edge cost model.
//!
//! Horizontal distance uses a flat equirectangular approximation around a
//! fixed reference latitude. It is only valid over a small region such as a
//! single town; it is not a geodesic.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::{GeoPoint, Node, WayKind};

/// Approximate meters per degree of latitude.
pub const METERS_PER_DEGREE_LAT: f64 = 111_000.0;

/// Reference speed on flat ground, in meters per hour (5 km/h).
pub const FLAT_WALKING_SPEED_M_PER_H: f64 = 5_000.0;

/// Tunables for edge costs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    /// Latitude (degrees) at which longitude degrees are scaled to meters.
    pub reference_latitude: f64,
    /// Extra cost per meter of elevation gained.
    pub uphill_penalty: f64,
    /// Multiplier applied to the whole cost of a stairs edge.
    pub stairs_factor: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            reference_latitude: 43.9711,
            uphill_penalty: 2.0,
            stairs_factor: 1.5,
        }
    }
}

impl CostModel {
    /// Reject settings that would let an edge cost less than its horizontal
    /// distance.
    pub fn validate(&self) -> Result<()> {
        if !self.reference_latitude.is_finite() || self.reference_latitude.abs() >= 90.0 {
            return Err(Error::InvalidCostModel {
                message: format!(
                    "reference latitude {} must lie strictly between -90 and 90",
                    self.reference_latitude
                ),
            });
        }
        if !self.uphill_penalty.is_finite() || self.uphill_penalty < 0.0 {
            return Err(Error::InvalidCostModel {
                message: format!(
                    "uphill penalty {} must be finite and non-negative",
                    self.uphill_penalty
                ),
            });
        }
        if !self.stairs_factor.is_finite() || self.stairs_factor <= 1.0 {
            return Err(Error::InvalidCostModel {
                message: format!("stairs factor {} must be greater than 1", self.stairs_factor),
            });
        }
        Ok(())
    }

    pub fn meters_per_degree_lon(&self) -> f64 {
        METERS_PER_DEGREE_LAT * self.reference_latitude.to_radians().cos()
    }

    /// Project a position onto local planar meters (x east, y north).
    pub fn project(&self, point: GeoPoint) -> [f64; 2] {
        [
            point.lon * self.meters_per_degree_lon(),
            point.lat * METERS_PER_DEGREE_LAT,
        ]
    }

    /// Horizontal distance in meters between two positions.
    pub fn horizontal_distance(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        let dx = (to.lon - from.lon) * self.meters_per_degree_lon();
        let dy = (to.lat - from.lat) * METERS_PER_DEGREE_LAT;
        (dx * dx + dy * dy).sqrt()
    }

    /// Cost of walking from `src` to `dest` along a way of type `kind`.
    ///
    /// Climbing adds `gain * uphill_penalty`; descending adds nothing. Stairs
    /// scale the whole sum.
    pub fn edge_cost(&self, src: &Node, dest: &Node, kind: &WayKind) -> f64 {
        let mut cost = self.horizontal_distance(src.position, dest.position);
        if dest.elevation > src.elevation {
            let gain = f64::from(dest.elevation) - f64::from(src.elevation);
            cost += gain * self.uphill_penalty;
        }
        if kind.is_steps() {
            cost *= self.stairs_factor;
        }
        cost
    }
}

/// Walking time in minutes for a total cost, at the flat-ground speed.
pub fn estimated_minutes(total_cost: f64) -> f64 {
    total_cost * 60.0 / FLAT_WALKING_SPEED_M_PER_H
}
