//! Logic Host
//!
//! Loads a logic-sheet project and runs its playfield simulation headless.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use logic_host::project::ProjectLoader;
use logic_host::simulation::Simulation;

/// Headless runner for logic-sheet projects
#[derive(Parser, Debug)]
#[command(name = "logic_host")]
#[command(about = "Run a logic-sheet project without a renderer", long_about = None)]
struct Args {
    /// Path to the project directory
    #[arg(short, long, default_value = "./demo")]
    project: PathBuf,

    /// Number of ticks to simulate
    #[arg(short, long, default_value = "600")]
    ticks: u64,

    /// Seconds per tick
    #[arg(short, long, default_value_t = 1.0 / 60.0)]
    delta: f64,

    /// Log filter (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // The interpreter is synchronous; the runtime only serves file loading
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<()> {
    // Initialize tracing
    let filter = match &args.log {
        Some(filter) => EnvFilter::try_new(filter)?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("logic_host=info,logic_runtime=info")),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting logic host v{}", env!("CARGO_PKG_VERSION"));

    let project = ProjectLoader::load(&args.project)
        .await
        .with_context(|| format!("Failed to load project from {}", args.project.display()))?;
    info!("Loaded project: {} ({})", project.name(), project.id());

    let mut simulation = Simulation::new(&project).context("Failed to load logic sheets")?;
    simulation.run(args.ticks, args.delta);

    info!("Simulated {} ticks", simulation.tick());

    let mut state: Vec<_> = simulation.game_state().iter().collect();
    state.sort_by(|a, b| a.0.cmp(b.0));
    println!("Game state after {} ticks:", simulation.tick());
    for (key, value) in state {
        println!("  {} = {}", key, value);
    }
    for actor in simulation.actors() {
        println!(
            "  {} ({}) at ({:.1}, {:.1})",
            actor.id, actor.context.tag, actor.context.x, actor.context.y
        );
    }

    Ok(())
}
