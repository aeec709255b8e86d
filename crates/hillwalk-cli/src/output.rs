//! Output formatting for routes, nodes and elevation lookups.
//!
//! Every renderer writes into an `io::Write` so the commands can target
//! stdout while tests capture into a `Vec<u8>`.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use hillwalk_lib::{
    Error as LibError, GeoPoint, Graph, GridCell, Node, NodeId, RouteAlgorithm, RouteLeg,
    RoutePlan, WayId,
};

use crate::terminal::{format_minutes, ColorPalette};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// One node along a planned route.
#[derive(Debug, Clone, Serialize)]
pub struct RouteStepView {
    pub id: NodeId,
    pub position: GeoPoint,
    pub elevation: i16,
    pub label: String,
    /// Way used to reach this node; absent for the first step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hop_cost: Option<f64>,
}

/// Serializable route summary joined with node details from the graph.
#[derive(Debug, Clone, Serialize)]
pub struct RouteView {
    pub status: &'static str,
    pub algorithm: RouteAlgorithm,
    pub start: NodeId,
    pub goal: NodeId,
    pub hops: usize,
    pub total_cost: f64,
    pub estimated_minutes: f64,
    pub steps: Vec<RouteStepView>,
    pub legs: Vec<RouteLeg>,
}

impl RouteView {
    /// Attach node positions, elevations and labels to a plan.
    pub fn new(graph: &Graph, plan: &RoutePlan) -> hillwalk_lib::Result<Self> {
        let mut steps = Vec::with_capacity(plan.steps.len());
        for (index, &id) in plan.steps.iter().enumerate() {
            let node = graph.node(id).ok_or(LibError::UnknownNode { id })?;
            let hop = index.checked_sub(1);
            steps.push(RouteStepView {
                id,
                position: node.position,
                elevation: node.elevation,
                label: node.label().to_string(),
                via: hop.and_then(|hop| plan.way_names.get(hop).cloned()),
                hop_cost: hop.and_then(|hop| plan.hop_costs.get(hop).copied()),
            });
        }

        Ok(Self {
            status: "found",
            algorithm: plan.algorithm,
            start: plan.start,
            goal: plan.goal,
            hops: plan.hop_count(),
            total_cost: plan.total_cost,
            estimated_minutes: plan.estimated_minutes(),
            steps,
            legs: plan.legs(),
        })
    }
}

/// Render a route in text form.
///
/// Uses `+`/`|`/`-` prefixes for first/middle/last steps, then one line per leg.
pub fn render_route_text<W: Write>(
    out: &mut W,
    view: &RouteView,
    palette: ColorPalette,
) -> io::Result<()> {
    let p = palette;
    writeln!(
        out,
        "Route from {} to {} ({} hops; algorithm: {}):",
        view.start, view.goal, view.hops, view.algorithm
    )?;

    let len = view.steps.len();
    let mut previous: Option<i16> = None;
    for (i, step) in view.steps.iter().enumerate() {
        let prefix = if i == 0 {
            '+'
        } else if i + 1 == len {
            '-'
        } else {
            '|'
        };
        write!(
            out,
            " {prefix} {} {}{}{} {} m",
            step.id, p.gray, step.position, p.reset, step.elevation
        )?;
        if let Some(climb) = previous
            .map(|before| step.elevation as i32 - before as i32)
            .filter(|climb| *climb > 0)
        {
            write!(out, " {}(+{climb} m){}", p.orange, p.reset)?;
        }
        if let Some(via) = &step.via {
            write!(out, " via {}{via}{}", p.white_bold, p.reset)?;
        }
        writeln!(out)?;
        previous = Some(step.elevation);
    }

    if !view.legs.is_empty() {
        writeln!(out, "\nLegs:")?;
        for leg in &view.legs {
            let noun = if leg.hops == 1 { "hop" } else { "hops" };
            writeln!(
                out,
                " - {}{}{}: {} {noun}, {}{:.0}{}",
                p.white_bold, leg.way_name, p.reset, leg.hops, p.green, leg.cost, p.reset
            )?;
        }
    }

    writeln!(
        out,
        "\nTotal cost: {}{:.0}{} (about {} at 5 km/h)",
        p.green,
        view.total_cost,
        p.reset,
        format_minutes(view.estimated_minutes)
    )
}

#[derive(Serialize)]
struct UnreachableView<'a> {
    status: &'static str,
    start: &'a str,
    goal: &'a str,
}

/// Report that no route joins the two endpoints, given by their display form.
pub fn render_unreachable<W: Write>(
    out: &mut W,
    start: &str,
    goal: &str,
    format: OutputFormat,
    palette: ColorPalette,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => writeln!(
            out,
            "{}no route{} from {start} to {goal}",
            palette.red, palette.reset
        ),
        OutputFormat::Json => write_json(
            out,
            &UnreachableView {
                status: "no route",
                start,
                goal,
            },
        ),
    }
}

/// Outgoing edge of an inspected node.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeView {
    pub target: NodeId,
    pub way: WayId,
    pub way_name: String,
    pub cost: f64,
}

/// Serializable node summary.
#[derive(Debug, Clone, Serialize)]
pub struct NodeView {
    pub id: NodeId,
    pub position: GeoPoint,
    pub elevation: i16,
    pub label: String,
    pub out_degree: usize,
    pub edges: Vec<EdgeView>,
}

impl NodeView {
    pub fn new(graph: &Graph, node: &Node) -> Self {
        let edges = node
            .edges()
            .iter()
            .map(|edge| EdgeView {
                target: edge.target,
                way: edge.way,
                way_name: graph.way_name(edge.way).to_string(),
                cost: edge.cost,
            })
            .collect::<Vec<_>>();
        Self {
            id: node.id,
            position: node.position,
            elevation: node.elevation,
            label: node.label().to_string(),
            out_degree: edges.len(),
            edges,
        }
    }
}

pub fn render_node_text<W: Write>(
    out: &mut W,
    view: &NodeView,
    palette: ColorPalette,
) -> io::Result<()> {
    let p = palette;
    writeln!(
        out,
        "Node {} {}{}{} {} m",
        view.id, p.gray, view.position, p.reset, view.elevation
    )?;
    writeln!(out, "Label: {}", view.label)?;
    writeln!(out, "Out-degree: {}", view.out_degree)?;
    for edge in &view.edges {
        writeln!(
            out,
            " -> {} via {}{}{} ({}{:.1}{})",
            edge.target, p.white_bold, edge.way_name, p.reset, p.green, edge.cost, p.reset
        )?;
    }
    Ok(())
}

/// Serializable result of a raw grid lookup.
#[derive(Debug, Clone, Serialize)]
pub struct ElevationView {
    pub lat: f64,
    pub lon: f64,
    pub row: usize,
    pub col: usize,
    pub elevation: i16,
}

impl ElevationView {
    pub fn new(lat: f64, lon: f64, cell: GridCell, elevation: i16) -> Self {
        Self {
            lat,
            lon,
            row: cell.row,
            col: cell.col,
            elevation,
        }
    }
}

pub fn render_elevation_text<W: Write>(out: &mut W, view: &ElevationView) -> io::Result<()> {
    writeln!(
        out,
        "{} m at ({}, {}) [row {}, col {}]",
        view.elevation, view.lat, view.lon, view.row, view.col
    )
}

/// Write `value` as pretty JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(io::Error::other)?;
    out.write_all(b"\n")
}
