//! # Duolift Control
//!
//! Simulator for two stacker cranes sharing one vertical shaft.
//!
//! Loads the TOML configuration (falling back to built-in defaults
//! when no file exists), creates the in-process variable store, and
//! drives both lift state machines on the configured tick cadence
//! until interrupted.

use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

use duolift::config::ConfigError;
use duolift_control::config::{load_config, SimConfig};
use duolift_control::cycle::CycleRunner;
use duolift_store::MemoryStore;

/// Duolift Control — dual stacker-crane shaft simulator
#[derive(Parser, Debug)]
#[command(name = "duolift_control")]
#[command(version)]
#[command(about = "Dual stacker-crane job state machines on one shared shaft")]
struct Args {
    /// Path to the simulator configuration TOML.
    #[arg(default_value = "config/duolift.toml")]
    config: PathBuf,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("Duolift Control v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Duolift Control shutdown complete");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match load_config(&args.config) {
        Ok(config) => {
            info!(
                "Config OK: rows=1..={}, boundary={}, cadence={}ms",
                config.layout.max_row,
                config.layout.zone_boundary,
                config.timing.cycle_interval_ms,
            );
            config
        }
        Err(ConfigError::FileNotFound) => {
            warn!(
                "No config at '{}'; using built-in defaults",
                args.config.display()
            );
            SimConfig::default()
        }
        Err(e) => return Err(Box::new(e)),
    };

    let store = Arc::new(MemoryStore::new());
    let mut runner = CycleRunner::new(config, store)?;
    info!(
        "CycleRunner initialized: '{}' at row {}, '{}' at row {}",
        runner.config.lifts[0].name,
        runner.config.lifts[0].initial_row,
        runner.config.lifts[1].name,
        runner.config.lifts[1].initial_row,
    );

    // Graceful shutdown on ctrl-c.
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    runner.run(&running)?;

    info!(
        "Final stats: cycles={}, overruns={}",
        runner.stats.cycle_count, runner.stats.overruns
    );
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
