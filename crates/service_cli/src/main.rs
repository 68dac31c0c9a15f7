//! otc-recon - Command Line Trade Confirmation Matching
//!
//! This is the operational entry point for the confirmation matching
//! library.
//!
//! # Commands
//!
//! - `otc-recon match-pair --source <file> --target <file>` - Match one pair of confirmations
//! - `otc-recon match-batch --bank <file> --counterparty <file>` - Match two pools one-to-one
//! - `otc-recon check` - Validate the run configuration
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate loads trade files and run
//! configuration, hands them to `recon_matching` and renders the results.
//! Persistence and exception workflows stay with downstream systems.

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod loader;
mod output;

pub use error::{CliError, Result};

use config::{OutputFormat, ReconConfig};

/// OTC trade confirmation matching CLI
#[derive(Parser)]
#[command(name = "otc-recon")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "otc-recon.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match one bank confirmation against one counterparty confirmation
    MatchPair {
        /// Bank trade file (JSON object or single-row CSV)
        #[arg(short, long)]
        source: String,

        /// Counterparty trade file
        #[arg(short, long)]
        target: String,

        /// Output format (overrides configuration)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Match a pool of bank trades against a pool of counterparty trades
    MatchBatch {
        /// Bank trades file (JSON array or CSV)
        #[arg(short, long)]
        bank: String,

        /// Counterparty trades file (JSON array or CSV)
        #[arg(short = 'p', long)]
        counterparty: String,

        /// Output format (overrides configuration)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Check run configuration and print the effective criteria
    Check,
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level directive '{}'", level))?,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .context("tracing subscriber already installed")?;
    Ok(())
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {

    let config = ReconConfig::load_with_env_and_validate(Path::new(&cli.config))?;
    let level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    init_tracing(level)?;

    if cli.verbose {
        info!("Verbose mode enabled");
    }
    info!("Configuration: {}", cli.config);

    match cli.command {
        Commands::MatchPair {
            source,
            target,
            format,
        } => commands::match_pair::run(
            &config,
            &source,
            &target,
            format.unwrap_or(config.output_format),
        ),
        Commands::MatchBatch {
            bank,
            counterparty,
            format,
        } => commands::match_batch::run(
            &config,
            &bank,
            &counterparty,
            format.unwrap_or(config.output_format),
        ),
        Commands::Check => commands::check::run(&config),
    }
}
