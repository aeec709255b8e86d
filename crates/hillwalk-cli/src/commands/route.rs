//! Route command handler for planning walks between two endpoints.

use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;

use hillwalk_lib::{
    plan_route, NodeId, PlanOutcome, RouteAlgorithm, RouteEndpoint, RouteRequest,
};

use crate::commands::LoadedMap;
use crate::output::{render_route_text, render_unreachable, write_json, OutputFormat, RouteView};
use crate::terminal::ColorPalette;

/// Algorithm names accepted by `--algorithm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AlgorithmArg {
    /// A* guided by horizontal distance (default).
    #[default]
    AStar,
    /// Dijkstra without a heuristic.
    Dijkstra,
}

impl From<AlgorithmArg> for RouteAlgorithm {
    fn from(value: AlgorithmArg) -> Self {
        match value {
            AlgorithmArg::AStar => RouteAlgorithm::AStar,
            AlgorithmArg::Dijkstra => RouteAlgorithm::Dijkstra,
        }
    }
}

/// Arguments for the route command.
#[derive(Debug, Clone, Default)]
pub struct RouteCommandArgs {
    pub from: Option<NodeId>,
    pub to: Option<NodeId>,
    pub from_coord: Option<(f64, f64)>,
    pub to_coord: Option<(f64, f64)>,
    pub algorithm: AlgorithmArg,
}

/// Whether the route command found a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStatus {
    Found,
    Unreachable,
}

fn endpoint(
    id: Option<NodeId>,
    coord: Option<(f64, f64)>,
    flag: &str,
) -> Result<RouteEndpoint> {
    match (id, coord) {
        (Some(id), None) => Ok(RouteEndpoint::Node(id)),
        (None, Some((lat, lon))) => Ok(RouteEndpoint::Coordinate { lat, lon }),
        _ => bail!("exactly one of --{flag} or --{flag}-coord is required"),
    }
}

impl RouteCommandArgs {
    /// Convert CLI args to a library [`RouteRequest`].
    pub fn to_request(&self) -> Result<RouteRequest> {
        Ok(RouteRequest {
            start: endpoint(self.from, self.from_coord, "from")?,
            goal: endpoint(self.to, self.to_coord, "to")?,
            algorithm: self.algorithm.into(),
            node_index: None,
        })
    }
}

/// Handle the route subcommand.
pub fn handle_route_command<W: Write>(
    out: &mut W,
    map: &LoadedMap,
    args: &RouteCommandArgs,
    format: OutputFormat,
    palette: ColorPalette,
) -> Result<RouteStatus> {
    let request = args.to_request()?;
    let outcome = plan_route(&map.graph, &request).context("route planning failed")?;

    match outcome {
        PlanOutcome::Found(plan) => {
            let view = RouteView::new(&map.graph, &plan)?;
            match format {
                OutputFormat::Text => render_route_text(out, &view, palette)?,
                OutputFormat::Json => write_json(out, &view)?,
            }
            Ok(RouteStatus::Found)
        }
        PlanOutcome::Unreachable => {
            render_unreachable(
                out,
                &request.start.to_string(),
                &request.goal.to_string(),
                format,
                palette,
            )?;
            Ok(RouteStatus::Unreachable)
        }
    }
}
