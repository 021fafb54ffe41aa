// SPDX-License-Identifier: MIT OR Apache-2.0
//! `ShapePlay` Player - headless behavior graph runner
//!
//! Loads a player config and the graph document it names, plays a game,
//! scene or object node for a fixed number of ticks with scripted input,
//! and prints what every behavior tree returned.

mod config;
mod demo;
mod error;
mod player;
mod report;

use clap::{Parser, Subcommand};
use config::{PlayerConfig, ReportFormat, DEFAULT_LOG_FILTER};
use error::PlayerError;
use shapeplay_graph::GraphDocument;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Headless `ShapePlay` behavior graph player
#[derive(Parser, Debug)]
#[command(name = "shapeplay", version)]
#[command(about = "Play ShapePlay behavior graphs without a window", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a graph as described by a player config
    Play {
        /// Path to the player config (RON)
        config: PathBuf,

        /// Override the number of ticks
        #[arg(long)]
        ticks: Option<u64>,

        /// Override the name of the node to play
        #[arg(long)]
        target: Option<String>,

        /// Override the random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a sample graph and player config
    Demo {
        /// Output directory
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

fn init_tracing(filter: Option<&str>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter.unwrap_or(DEFAULT_LOG_FILTER)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(command: Command) -> Result<(), PlayerError> {
    match command {
        Command::Play {
            config: config_path,
            ticks,
            target,
            seed,
            json,
        } => {
            let mut config = PlayerConfig::load(&config_path)?;
            init_tracing(config.log_filter.as_deref());
            tracing::info!("Starting ShapePlay Player v{}", env!("CARGO_PKG_VERSION"));

            if let Some(ticks) = ticks {
                config.ticks = ticks;
            }
            if let Some(target) = target {
                config.play_target = target;
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }
            if json {
                config.report = ReportFormat::Json;
            }

            let document = GraphDocument::load(&config.graph_path(&config_path))?;
            let report = player::play(document.graph, &config)?;
            println!("{}", report::render(&report, config.report)?);
            Ok(())
        }
        Command::Demo { dir } => {
            init_tracing(None);
            let config_path = demo::write(&dir)?;
            println!("Wrote {}", config_path.display());
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        tracing::error!("Player failed: {e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
