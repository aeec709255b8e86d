// Subcommand handlers.
//
// Each module handles one subcommand; main.rs parses arguments, loads inputs
// through the helpers here and dispatches.

pub mod elevation;
pub mod node;
pub mod route;

use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use hillwalk_lib::{
    build_graph, load_entities, BuildOptions, BuildReport, CostModel, ElevationGrid, Graph,
};

/// Cost-model fields overridden on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostOverrides {
    pub uphill_penalty: Option<f64>,
    pub stairs_factor: Option<f64>,
    pub reference_latitude: Option<f64>,
}

impl CostOverrides {
    /// Apply the overrides on top of `base` and validate the result.
    pub fn apply(&self, base: CostModel) -> Result<CostModel> {
        let cost = CostModel {
            uphill_penalty: self.uphill_penalty.unwrap_or(base.uphill_penalty),
            stairs_factor: self.stairs_factor.unwrap_or(base.stairs_factor),
            reference_latitude: self.reference_latitude.unwrap_or(base.reference_latitude),
        };
        cost.validate().context("invalid cost model options")?;
        Ok(cost)
    }
}

/// Walking graph loaded for one invocation, with what the build skipped.
#[derive(Debug)]
pub struct LoadedMap {
    pub graph: Graph,
    pub report: BuildReport,
}

impl LoadedMap {
    /// Write one warning line per entity the build skipped as malformed.
    pub fn write_rejections<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for rejection in &self.report.rejected {
            writeln!(out, "warning: skipped {rejection}")?;
        }
        Ok(())
    }
}

/// Load an SRTM tile, taking its bounds from the file name.
pub fn load_grid(path: &Path) -> Result<ElevationGrid> {
    ElevationGrid::load_hgt(path)
        .with_context(|| format!("failed to load elevation tile {}", path.display()))
}

/// Load the elevation tile and map entities, then build the walking graph.
pub fn load_map(
    elevation: &Path,
    map: Option<&Path>,
    cost: &CostModel,
    options: BuildOptions,
) -> Result<LoadedMap> {
    let Some(map) = map else {
        bail!("a map file is required; pass --map or set HILLWALK_MAP");
    };

    let grid = load_grid(elevation)?;
    let entities = load_entities(map)
        .with_context(|| format!("failed to load map entities from {}", map.display()))?;
    let (graph, report) = build_graph(&grid, &entities, cost, options)
        .with_context(|| format!("failed to build walking graph from {}", map.display()))?;

    info!(
        map = %map.display(),
        nodes = report.nodes,
        ways = report.ways,
        rejected = report.rejected.len(),
        "map loaded"
    );
    Ok(LoadedMap { graph, report })
}

/// Parse a `LAT,LON` pair in decimal degrees.
pub fn parse_coordinate(value: &str) -> std::result::Result<(f64, f64), String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON but got '{value}'"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{}'", lon.trim()))?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {lat} is outside [-90, 90]"));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("longitude {lon} is outside [-180, 180]"));
    }
    Ok((lat, lon))
}
