//! # Qontak Broadcast CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Config loading with environment/flag overrides
//! - Batch broadcast with progress output and CSV results
//! - Ctrl+C / SIGTERM handling that stops between recipients

mod cli;
mod commands;
mod error;
mod settings;

use anyhow::Result;
use clap::Parser;
use observability::LoggingConfig;
use tracing::debug;

use cli::{Cli, Commands};
use commands::{run_broadcast, run_sign, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        "Qontak broadcast CLI starting"
    );

    let result = match &cli.command {
        Commands::Run(args) => run_broadcast(args).await,
        Commands::Validate(args) => run_validate(args).await,
        Commands::Sign(args) => run_sign(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %format!("{e:#}"), "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    let default_log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    observability::init_logging(&LoggingConfig {
        format: cli.log_format.into(),
        default_level: default_log_level.to_string(),
    })
}
