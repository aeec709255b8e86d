//! Elevation command handler: raw lookup against the loaded tile.

use std::io::Write;

use anyhow::{Context, Result};

use hillwalk_lib::ElevationGrid;

use crate::output::{render_elevation_text, write_json, ElevationView, OutputFormat};

/// Look up one coordinate. Points off the tile fail with the violated bound.
pub fn handle_elevation_command<W: Write>(
    out: &mut W,
    grid: &ElevationGrid,
    lat: f64,
    lon: f64,
    format: OutputFormat,
) -> Result<()> {
    let cell = grid.cell(lat, lon).context("elevation lookup failed")?;
    let view = ElevationView::new(lat, lon, cell, grid.sample(cell));
    match format {
        OutputFormat::Text => render_elevation_text(out, &view)?,
        OutputFormat::Json => write_json(out, &view)?,
    }
    Ok(())
}
