use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use liftoff_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "liftoff")]
#[command(author, version, about = "A scroll-driven space scene for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the scene (default)
    Run {
        /// Show the debug status line
        #[arg(long)]
        debug: bool,
        /// Seed for star, asteroid and galaxy placement
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List the configured sections and their marker positions
    Sections {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Log to stderr, or to `log_file` when the terminal belongs to the scene
fn init_logging(level: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| level.into()));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run { debug: false, seed: None }) {
        Commands::Config { action } => {
            // Works without a readable config so a broken file can be replaced
            init_logging(&AppConfig::default().general.log_level, None)?;
            commands::config::run(action)
        }
        Commands::Sections { json } => {
            let config = AppConfig::load()?;
            init_logging(&config.general.log_level, None)?;
            commands::sections::run(&config, json)
        }
        Commands::Run { debug, seed } => {
            let config = AppConfig::load()?;
            init_logging(&config.general.log_level, Some(&config.log_path()))?;
            commands::run::run(Arc::new(config), debug, seed).await
        }
    }
}
