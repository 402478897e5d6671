//! Bee Colonies - headless runner
//!
//! Builds a simulation from a TOML config (or the defaults), drives it with
//! the chosen policies until the run is over and prints a summary.

use std::path::PathBuf;

use bee_colonies::behavior::{BeeKind, QueenKind, WaspKind};
use bee_colonies::core::error::Result;
use bee_colonies::world::WorldLayout;
use bee_colonies::{ColonyRunner, PolicySet, Simulation, SimulationConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Headless bee colony simulation
#[derive(Parser, Debug)]
#[command(name = "bee_colonies")]
#[command(about = "Run foraging bee colonies against wasps and report how they fared")]
struct Args {
    /// TOML configuration file (defaults are used when absent)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// JSON layout with flowers, hives and wasps placed by hand
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Random seed, overrides the config
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum ticks, overrides the config
    #[arg(long)]
    max_steps: Option<u64>,

    #[arg(long, value_enum, default_value_t = QueenKind::default())]
    queen: QueenKind,

    #[arg(long, value_enum, default_value_t = BeeKind::default())]
    bee: BeeKind,

    #[arg(long, value_enum, default_value_t = WaspKind::default())]
    wasp: WaspKind,

    /// Write the full run summary as JSON to this file
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bee_colonies=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.run.seed = seed;
    }
    if let Some(max_steps) = args.max_steps {
        config.run.max_steps = max_steps;
    }

    tracing::info!(
        seed = config.run.seed,
        colonies = config.colony_count(),
        wasps = config.wasps.count,
        queen = ?args.queen,
        bee = ?args.bee,
        "Bee colonies starting..."
    );

    let sim = match &args.layout {
        Some(path) => {
            let layout = WorldLayout::from_json(&std::fs::read_to_string(path)?)?;
            Simulation::with_layout(config, &layout)?
        }
        None => Simulation::new(config)?,
    };

    let policies = PolicySet {
        queen: args.queen,
        bee: args.bee,
        wasp: args.wasp,
    };
    let mut runner = ColonyRunner::new(sim, policies);
    let summary = runner.run()?;

    println!("{}", summary.summary());

    if let Some(path) = &args.output {
        std::fs::write(path, summary.to_json())?;
        println!("\nFull output written to {}", path.display());
    }
    Ok(())
}
