use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use hillwalk_cli::commands::elevation::handle_elevation_command;
use hillwalk_cli::commands::node::handle_node_command;
use hillwalk_cli::commands::route::{
    handle_route_command, AlgorithmArg, RouteCommandArgs, RouteStatus,
};
use hillwalk_cli::commands::{load_grid, load_map, parse_coordinate, CostOverrides};
use hillwalk_cli::output::OutputFormat;
use hillwalk_cli::terminal::ColorPalette;
use hillwalk_lib::{BuildOptions, CostModel, NodeId};

/// Exit status for a well-formed request with no route.
const EXIT_NO_ROUTE: u8 = 2;

#[derive(Parser, Debug)]
#[command(author, version, about = "Elevation-aware walking route planner")]
struct Cli {
    /// SRTM elevation tile (.hgt) named after its southwest corner, e.g. N43W079.hgt.
    #[arg(long, env = "HILLWALK_ELEVATION")]
    elevation: PathBuf,

    /// JSON file with the map's points and ways.
    #[arg(long, env = "HILLWALK_MAP")]
    map: Option<PathBuf>,

    /// Extra cost per meter climbed.
    #[arg(long)]
    uphill_penalty: Option<f64>,

    /// Cost multiplier for stairs.
    #[arg(long)]
    stairs_factor: Option<f64>,

    /// Latitude used to scale longitude degrees to meters.
    #[arg(long = "reference-lat", allow_negative_numbers = true)]
    reference_lat: Option<f64>,

    /// Fail on malformed ways instead of skipping them.
    #[arg(long)]
    strict: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan the cheapest walk between two nodes or coordinates.
    Route {
        /// Starting node id.
        #[arg(
            long,
            allow_negative_numbers = true,
            conflicts_with = "from_coord",
            required_unless_present = "from_coord"
        )]
        from: Option<NodeId>,
        /// Destination node id.
        #[arg(
            long,
            allow_negative_numbers = true,
            conflicts_with = "to_coord",
            required_unless_present = "to_coord"
        )]
        to: Option<NodeId>,
        /// Starting coordinate as LAT,LON; snapped to the nearest node.
        #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true, value_parser = parse_coordinate)]
        from_coord: Option<(f64, f64)>,
        /// Destination coordinate as LAT,LON; snapped to the nearest node.
        #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true, value_parser = parse_coordinate)]
        to_coord: Option<(f64, f64)>,
        /// Search algorithm.
        #[arg(long, value_enum, default_value_t = AlgorithmArg::AStar)]
        algorithm: AlgorithmArg,
    },
    /// Show a node's position, elevation, label and outgoing edges.
    Node {
        #[arg(long, allow_negative_numbers = true)]
        id: NodeId,
    },
    /// Look up the raw elevation sample for a coordinate.
    Elevation {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    let cost = CostOverrides {
        uphill_penalty: cli.uphill_penalty,
        stairs_factor: cli.stairs_factor,
        reference_latitude: cli.reference_lat,
    }
    .apply(CostModel::default())?;
    let options = BuildOptions { strict: cli.strict };
    let palette = ColorPalette::detect();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let code = match cli.command {
        Command::Route {
            from,
            to,
            from_coord,
            to_coord,
            algorithm,
        } => {
            let map = load_map(&cli.elevation, cli.map.as_deref(), &cost, options)?;
            map.write_rejections(&mut io::stderr().lock())?;
            let args = RouteCommandArgs {
                from,
                to,
                from_coord,
                to_coord,
                algorithm,
            };
            match handle_route_command(&mut out, &map, &args, cli.format, palette)? {
                RouteStatus::Found => ExitCode::SUCCESS,
                RouteStatus::Unreachable => ExitCode::from(EXIT_NO_ROUTE),
            }
        }
        Command::Node { id } => {
            let map = load_map(&cli.elevation, cli.map.as_deref(), &cost, options)?;
            map.write_rejections(&mut io::stderr().lock())?;
            handle_node_command(&mut out, &map, id, cli.format, palette)?;
            ExitCode::SUCCESS
        }
        Command::Elevation { lat, lon } => {
            let grid = load_grid(&cli.elevation)?;
            handle_elevation_command(&mut out, &grid, lat, lon, cli.format)?;
            ExitCode::SUCCESS
        }
    };
    out.flush()?;
    Ok(code)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
