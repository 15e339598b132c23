//! BSP level generator
//!
//! Generates one or more levels and prints them as ASCII maps or JSON.

mod render;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use lg_core::generator::GenerationHooks;
use lg_core::level::{Block, Hallway, PlacedProp, PropCatalog, PropCategory, Room};
use lg_core::{GameRng, GenerationError, GeneratorConfig, LevelGenerator};

/// BSP level generator
#[derive(Parser, Debug)]
#[command(name = "levelgen")]
#[command(author, version, about = "Generate connected room-and-hallway levels", long_about = None)]
struct Args {
    /// JSON file with `generator` and `catalog` sections
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Seed of the first level (random when omitted)
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Side of the square world
    #[arg(long = "world-size")]
    world_size: Option<f64>,

    /// Minimal room side
    #[arg(long = "min-room-side")]
    min_room_side: Option<f64>,

    /// Door and hallway width
    #[arg(long = "hallway-width")]
    hallway_width: Option<f64>,

    /// Number of reset/regenerate rounds
    #[arg(short = 'n', long = "cycles", default_value_t = 1)]
    cycles: u32,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Ascii)]
    format: OutputFormat,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short = 'l', long = "log-level", default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Ascii,
    Json,
}

/// Contents of the `--config` file
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct FileConfig {
    generator: GeneratorConfig,
    catalog: PropCatalog,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("cannot serialize level: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Generation(err) if err.is_config() => 2,
            CliError::Generation(_) => 3,
            _ => 1,
        }
    }
}

/// Logs what a game host would react to
struct LoggingHooks {
    round: u32,
}

impl GenerationHooks for LoggingHooks {
    fn rebuild_navigation(&mut self, rooms: &[Room], hallways: &[Hallway], blocks: &[Block]) {
        info!(
            round = self.round,
            rooms = rooms.len(),
            hallways = hallways.len(),
            blocks = blocks.len(),
            "navigation rebuild requested"
        );
    }

    fn spawn_at_room(&mut self, room: &Room, marker: Option<&PlacedProp>) {
        info!(
            round = self.round,
            room = room.id,
            position = ?marker.map(PlacedProp::world_position),
            "player spawn"
        );
    }
}

fn setup_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr).compact())
        .init();
}

fn load_config(path: &Path) -> Result<FileConfig, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn build_config(args: &Args) -> Result<FileConfig, CliError> {
    let mut file = match &args.config {
        Some(path) => load_config(path)?,
        None => FileConfig::default(),
    };
    if let Some(world_size) = args.world_size {
        file.generator.world_size = world_size;
    }
    if let Some(min_room_side) = args.min_room_side {
        file.generator.min_room_side = min_room_side;
    }
    if let Some(hallway_width) = args.hallway_width {
        file.generator.hallway_width = hallway_width;
    }
    Ok(file)
}

fn legend() -> String {
    PropCategory::iter()
        .map(|c| format!("{}={}", render::glyph(c), c))
        .collect::<Vec<_>>()
        .join(" ")
}

fn run(args: &Args) -> Result<(), CliError> {
    let FileConfig { generator, catalog } = build_config(args)?;
    let base_seed = args.seed.unwrap_or_else(|| GameRng::from_entropy().seed());
    let mut levels = LevelGenerator::new(generator, catalog);

    for round in 0..args.cycles.max(1) {
        levels.reset();
        let mut rng = GameRng::new(base_seed.wrapping_add(u64::from(round)));
        let mut hooks = LoggingHooks { round };
        let level = levels.generate_seeded(&mut rng, &mut hooks)?;

        match args.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(level)?),
            OutputFormat::Ascii => {
                println!(
                    "seed {} | {} rooms | {} hallways | {} props",
                    rng.seed(),
                    level.room_count(),
                    level.hallways.len(),
                    level.props.len()
                );
                println!("{}", legend());
                print!("{}", render::ascii(level));
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(&args.log_level);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "generation failed");
            eprintln!("levelgen: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
