//! Elevation raster and the geographic-to-grid mapper.
//!
//! The grid is square with `D` samples per side and covers a bounding box
//! anchored at its southwest corner. A coordinate maps to
//! `row = floor((lat - south) / lat_span * D)` and
//! `col = floor((lon - west) / lon_span * D)`; SRTM tiles span one degree,
//! so for them this is exactly `floor((lat - south) * D)`.
//!
//! Row 0 is the *southernmost* row in memory. HGT files store the northern
//! row first, so [`ElevationGrid::from_hgt_bytes`] flips rows on load.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Elevation substituted when a coordinate falls outside the grid.
pub const FALLBACK_ELEVATION: i16 = 0;

/// Geographic extent covered by an elevation grid, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// One-degree box anchored at a southwest corner, as used by SRTM tiles.
    pub fn from_southwest(south: f64, west: f64) -> Self {
        Self {
            south,
            west,
            north: south + 1.0,
            east: west + 1.0,
        }
    }

    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    pub fn lon_span(&self) -> f64 {
        self.east - self.west
    }
}

/// Side of the grid a coordinate fell off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    North,
    South,
    East,
    West,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Bound::North => "north",
            Bound::South => "south",
            Bound::East => "east",
            Bound::West => "west",
        };
        f.write_str(value)
    }
}

/// Integer cell inside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
}

/// Failed grid lookup, naming the bound that was violated.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("({lat}, {lon}) lies {bound} of the elevation grid")]
pub struct OutOfBounds {
    pub lat: f64,
    pub lon: f64,
    pub bound: Bound,
}

/// Map a coordinate onto a `dim x dim` grid covering `bounds`.
///
/// Rows are checked before columns, so a point off a corner reports its
/// north/south violation.
pub fn grid_cell(
    bounds: &BoundingBox,
    dim: usize,
    lat: f64,
    lon: f64,
) -> std::result::Result<GridCell, OutOfBounds> {
    let size = dim as f64;
    let row = ((lat - bounds.south) / bounds.lat_span() * size).floor();
    let col = ((lon - bounds.west) / bounds.lon_span() * size).floor();

    let violated = if !(row >= 0.0) {
        Some(Bound::South)
    } else if row >= size {
        Some(Bound::North)
    } else if !(col >= 0.0) {
        Some(Bound::West)
    } else if col >= size {
        Some(Bound::East)
    } else {
        None
    };

    match violated {
        Some(bound) => Err(OutOfBounds { lat, lon, bound }),
        None => Ok(GridCell {
            row: row as usize,
            col: col as usize,
        }),
    }
}

/// Square raster of signed elevation samples in meters.
#[derive(Debug, Clone)]
pub struct ElevationGrid {
    dim: usize,
    bounds: BoundingBox,
    samples: Vec<i16>,
}

impl ElevationGrid {
    /// Wrap row-major samples (row 0 = south) covering `bounds`.
    pub fn new(samples: Vec<i16>, bounds: BoundingBox) -> Result<Self> {
        let dim = integer_sqrt(samples.len());
        if dim == 0 || dim * dim != samples.len() {
            return Err(Error::InvalidElevationGrid {
                samples: samples.len(),
            });
        }
        Ok(Self {
            dim,
            bounds,
            samples,
        })
    }

    /// Decode an HGT payload: big-endian `i16` samples, northern row first.
    ///
    /// `D` is derived from the byte length; trailing bytes beyond `D * D`
    /// samples are ignored.
    pub fn from_hgt_bytes(bytes: &[u8], bounds: BoundingBox) -> Result<Self> {
        let dim = integer_sqrt(bytes.len() / 2);
        if dim == 0 {
            return Err(Error::InvalidElevationGrid { samples: 0 });
        }

        let mut samples = vec![0i16; dim * dim];
        for (file_row, chunk) in bytes[..dim * dim * 2].chunks_exact(dim * 2).enumerate() {
            let row = dim - 1 - file_row;
            for (col, pair) in chunk.chunks_exact(2).enumerate() {
                samples[row * dim + col] = i16::from_be_bytes([pair[0], pair[1]]);
            }
        }

        debug!(dim, "decoded HGT elevation grid");
        Self::new(samples, bounds)
    }

    /// Load an SRTM tile, deriving its bounds from a name like `N43W079.hgt`.
    pub fn load_hgt(path: &Path) -> Result<Self> {
        let (south, west) = tile_southwest(path).ok_or_else(|| Error::InvalidTileName {
            path: path.to_path_buf(),
        })?;
        Self::load_hgt_with_bounds(path, BoundingBox::from_southwest(south, west))
    }

    /// Load an HGT file covering an explicit bounding box.
    pub fn load_hgt_with_bounds(path: &Path, bounds: BoundingBox) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_hgt_bytes(&bytes, bounds)
    }

    /// Samples per side (`D`).
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Map a coordinate to its grid cell.
    pub fn cell(&self, lat: f64, lon: f64) -> std::result::Result<GridCell, OutOfBounds> {
        grid_cell(&self.bounds, self.dim, lat, lon)
    }

    /// Sample stored at a cell.
    pub fn sample(&self, cell: GridCell) -> i16 {
        self.samples[cell.row * self.dim + cell.col]
    }

    /// Strict elevation lookup.
    pub fn lookup(&self, lat: f64, lon: f64) -> std::result::Result<i16, OutOfBounds> {
        self.cell(lat, lon).map(|cell| self.sample(cell))
    }

    /// Elevation lookup that never fails: coordinates off the grid log the
    /// violated bound and yield [`FALLBACK_ELEVATION`].
    pub fn elevation_at(&self, lat: f64, lon: f64) -> i16 {
        self.elevation_or_fallback(lat, lon).0
    }

    /// Like [`Self::elevation_at`], also telling whether the fallback was used.
    pub fn elevation_or_fallback(&self, lat: f64, lon: f64) -> (i16, bool) {
        match self.lookup(lat, lon) {
            Ok(elevation) => (elevation, false),
            Err(miss) => {
                warn!(
                    lat = miss.lat,
                    lon = miss.lon,
                    bound = %miss.bound,
                    "coordinate outside elevation grid; using fallback elevation"
                );
                (FALLBACK_ELEVATION, true)
            }
        }
    }
}

/// Parse the southwest corner encoded in an SRTM file name.
pub fn tile_southwest(path: &Path) -> Option<(f64, f64)> {
    let stem = path.file_stem()?.to_str()?.to_ascii_uppercase();
    let mut chars = stem.chars();
    let lat_sign = match chars.next()? {
        'N' => 1.0,
        'S' => -1.0,
        _ => return None,
    };

    let rest: &str = chars.as_str();
    let split = rest.find(['E', 'W'])?;
    let (lat_digits, lon_part) = rest.split_at(split);
    let lon_sign = if lon_part.starts_with('E') { 1.0 } else { -1.0 };
    let lon_digits = &lon_part[1..];

    let lat: u32 = lat_digits.parse().ok()?;
    let lon: u32 = lon_digits.parse().ok()?;
    Some((lat_sign * f64::from(lat), lon_sign * f64::from(lon)))
}

fn integer_sqrt(value: usize) -> usize {
    let mut root = (value as f64).sqrt() as usize;
    while root * root > value {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= value {
        root += 1;
    }
    root
}
