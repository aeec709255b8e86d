//! Node command handler: inspect one node of the walking graph.

use std::io::Write;

use anyhow::Result;

use hillwalk_lib::{Error as LibError, NodeId};

use crate::commands::LoadedMap;
use crate::output::{render_node_text, write_json, NodeView, OutputFormat};
use crate::terminal::ColorPalette;

pub fn handle_node_command<W: Write>(
    out: &mut W,
    map: &LoadedMap,
    id: NodeId,
    format: OutputFormat,
    palette: ColorPalette,
) -> Result<()> {
    let node = map.graph.node(id).ok_or(LibError::UnknownNode { id })?;
    let view = NodeView::new(&map.graph, node);
    match format {
        OutputFormat::Text => render_node_text(out, &view, palette)?,
        OutputFormat::Json => write_json(out, &view)?,
    }
    Ok(())
}
