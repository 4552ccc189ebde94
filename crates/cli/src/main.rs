mod scenario;

use crate::scenario::ScenarioConfig;
use anyhow::Context;
use hexfield::{
    compute_fog_of_war, find_path, trace_line, AxialPoint, Color3, CubePoint,
    GridShape, HexGrid, LineStep, MovementCost, Point2, Tile, Vector2,
};
use log::{debug, LevelFilter};
use serde::Serialize;
use simple_logger::SimpleLogger;
use std::{
    fs::OpenOptions,
    io::{self, Write},
    path::PathBuf,
    process,
};
use structopt::StructOpt;

/// CLI for running queries against a hexfield board. A board is built from a
/// config file (or the defaults), obstacles are scattered over it, then one
/// query is run and its result is printed as JSON.
///
/// Points are given in axial form as "q,r". For negative values, either pass
/// them with an equals sign (--from=-3,2) or as the next argument.
#[derive(Debug, StructOpt)]
#[structopt(name = "hexfield")]
struct Opt {
    /// Path to a config file that defines the scenario. Supported formats:
    /// JSON, TOML
    #[structopt(short, long)]
    config: Option<PathBuf>,

    /// Override the board shape from the config. One of: triangle,
    /// parallelogram, hexagon, rectangle, line
    #[structopt(long)]
    shape: Option<GridShape>,

    /// Override the primary board size from the config
    #[structopt(long)]
    size: Option<u16>,

    /// Override the secondary board size from the config
    #[structopt(long)]
    secondary_size: Option<u16>,

    /// Override the obstacle RNG seed from the config
    #[structopt(long)]
    seed: Option<u64>,

    /// If given, write the JSON result to this file instead of stdout
    #[structopt(short, long)]
    output: Option<PathBuf>,

    /// The logging level to use. See
    /// https://docs.rs/log/0.4.11/log/enum.LevelFilter.html for options
    #[structopt(long, default_value = "warn")]
    log_level: LevelFilter,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Find the tile under a screen position
    Pick {
        #[structopt(allow_hyphen_values = true)]
        x: f64,
        #[structopt(allow_hyphen_values = true)]
        y: f64,
        /// Rotate the view by this many degrees before picking
        #[structopt(long, default_value = "0", allow_hyphen_values = true)]
        rotate: f64,
    },
    /// Trace a line of sight between two cells
    Los {
        #[structopt(long, allow_hyphen_values = true)]
        from: AxialPoint,
        #[structopt(long, allow_hyphen_values = true)]
        to: AxialPoint,
    },
    /// Compute what an observer can see
    Fog {
        #[structopt(long, allow_hyphen_values = true)]
        observer: AxialPoint,
        #[structopt(long, default_value = "5")]
        radius: u16,
    },
    /// Find a path between two cells, within a movement budget
    Path {
        #[structopt(long, allow_hyphen_values = true)]
        from: AxialPoint,
        #[structopt(long, allow_hyphen_values = true)]
        to: AxialPoint,
        #[structopt(long, default_value = "5")]
        budget: f64,
        /// If given, only cells the unit can currently see (from its starting
        /// cell, within this radius) may be crossed
        #[structopt(long)]
        fog_radius: Option<u16>,
    },
    /// Print the full scenario config, after overrides, as TOML
    Config,
}

impl Command {
    /// Cells that the query starts or ends at. These are kept clear of
    /// obstacles.
    fn endpoints(&self) -> Vec<CubePoint> {
        match self {
            Self::Los { from, to } | Self::Path { from, to, .. } => {
                vec![CubePoint::from_axial(*from), CubePoint::from_axial(*to)]
            }
            Self::Fog { observer, .. } => {
                vec![CubePoint::from_axial(*observer)]
            }
            Self::Pick { .. } | Self::Config => Vec::new(),
        }
    }
}

#[derive(Serialize)]
struct PickOutput<'a> {
    screen: Point2,
    canvas_size: Vector2,
    rotation: f64,
    point: CubePoint,
    tile: Option<&'a Tile>,
}

#[derive(Serialize)]
struct LineOutput {
    from: CubePoint,
    to: CubePoint,
    clear: bool,
    steps: Vec<LineStep>,
}

#[derive(Serialize)]
struct FogOutput {
    observer: CubePoint,
    radius: u16,
    visible: Vec<CubePoint>,
    hidden: usize,
}

#[derive(Serialize)]
struct PathOutput {
    reached_target: bool,
    furthest_affordable: Option<CubePoint>,
    reachable: usize,
    steps: Vec<PathStepOutput>,
}

#[derive(Serialize)]
struct PathStepOutput {
    point: CubePoint,
    cost: MovementCost,
    within_budget: bool,
    /// Overlay color a renderer would use for this step
    color: String,
}

/// Colors for the path overlay: affordable this turn, and not
const PATH_COLORS: (Color3, Color3) = (
    Color3 {
        red: 0.2,
        green: 0.8,
        blue: 0.2,
    },
    Color3 {
        red: 0.8,
        green: 0.3,
        blue: 0.1,
    },
);

/// Is sight blocked by this cell? Cells off the board are open air.
fn sight(grid: &HexGrid) -> impl Fn(CubePoint) -> bool + '_ {
    move |point| {
        grid.tile(point)
            .map_or(true, |tile| !tile.terrain().blocks_sight())
    }
}

/// Serialize a query result as pretty JSON
fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("error serializing output")
}

/// Run a command against the scenario and render its output. Queries build
/// the board first and print JSON. The config is printed as TOML, so it can be
/// fed right back in with --config.
fn render_command(
    command: &Command,
    config: &ScenarioConfig,
) -> anyhow::Result<String> {
    let build = || config.build(&command.endpoints());
    let output = match *command {
        Command::Pick { x, y, rotate } => {
            let mut grid = build()?;
            grid.rotate_degrees(rotate);
            let screen = Point2::new(x, y);
            to_json(&PickOutput {
                screen,
                canvas_size: grid.canvas_size(),
                rotation: grid.rotation(),
                point: grid.pick_point(screen),
                tile: grid.pick(screen),
            })?
        }
        Command::Los { from, to } => {
            let grid = build()?;
            let (from, to) =
                (CubePoint::from_axial(from), CubePoint::from_axial(to));
            let steps = trace_line(from, to, sight(&grid));
            to_json(&LineOutput {
                from,
                to,
                clear: steps.iter().all(|step| step.visible),
                steps,
            })?
        }
        Command::Fog { observer, radius } => {
            let grid = build()?;
            let observer = CubePoint::from_axial(observer);
            let fog =
                compute_fog_of_war(&grid, observer, radius, sight(&grid))?;
            let visible: Vec<CubePoint> = fog.visible_points().collect();
            to_json(&FogOutput {
                observer,
                radius,
                hidden: fog.len() - visible.len(),
                visible,
            })?
        }
        Command::Path {
            from,
            to,
            budget,
            fog_radius,
        } => {
            let grid = build()?;
            let (from, to) =
                (CubePoint::from_axial(from), CubePoint::from_axial(to));
            let fog = fog_radius
                .map(|radius| {
                    compute_fog_of_war(&grid, from, radius, sight(&grid))
                })
                .transpose()?;
            let path = find_path(
                &grid,
                from,
                to,
                MovementCost(budget),
                |_| false,
                |point| fog.as_ref().map_or(true, |fog| fog.is_visible(point)),
            )?;

            let steps = path
                .steps()
                .iter()
                .map(|step| PathStepOutput {
                    point: step.point,
                    cost: step.cost,
                    within_budget: step.within_budget,
                    color: if step.within_budget {
                        PATH_COLORS.0.to_html()
                    } else {
                        PATH_COLORS.1.to_html()
                    },
                })
                .collect();
            to_json(&PathOutput {
                reached_target: path.reached_target(),
                furthest_affordable: path
                    .furthest_affordable()
                    .map(|step| step.point),
                reachable: path.reachable().count(),
                steps,
            })?
        }
        Command::Config => toml::to_string_pretty(config)
            .context("error serializing config")?,
    };
    Ok(output)
}

/// Run the CLI with some options
fn run(opt: Opt) -> anyhow::Result<()> {
    SimpleLogger::new().with_level(opt.log_level).init()?;

    let mut config = match &opt.config {
        Some(config_path) => ScenarioConfig::load(config_path)?,
        None => ScenarioConfig::default(),
    };
    if let Some(shape) = opt.shape {
        config.grid.shape = shape;
    }
    if let Some(size) = opt.size {
        config.grid.size = size;
    }
    if let Some(secondary_size) = opt.secondary_size {
        config.grid.secondary_size = secondary_size;
    }
    if let Some(seed) = opt.seed {
        config.obstacles.seed = seed;
    }
    debug!("Running {:?} with {:?}", opt.command, config);

    let output = render_command(&opt.command, &config)?;
    match &opt.output {
        Some(output_path) => {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(output_path)
                .with_context(|| {
                    format!("error opening output file {:?}", output_path)
                })?;
            writeln!(file, "{}", output).with_context(|| {
                format!("error writing to file {:?}", output_path)
            })?;
        }
        None => writeln!(io::stdout(), "{}", output)?,
    }
    Ok(())
}

fn main() {
    let exit_code = match run(Opt::from_args()) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            1
        }
    };
    process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_renders_as_loadable_toml() {
        let config = ScenarioConfig::default();
        let output = render_command(&Command::Config, &config).unwrap();
        let parsed: ScenarioConfig = toml::from_str(&output).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_query_renders_as_json() {
        let command = Command::Los {
            from: AxialPoint::new(-3, 0),
            to: AxialPoint::new(3, 0),
        };
        let output =
            render_command(&command, &ScenarioConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(value["clear"].is_boolean());
        assert_eq!(value["steps"].as_array().unwrap().len(), 5);
    }
}
