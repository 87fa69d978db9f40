//! Websift main entry point
//!
//! This is the command-line interface for the Websift scraping pipeline.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use websift::config::load_config_with_hash;
use websift::output::print_run_stats;
use websift::scrape::Pipeline;

/// Websift: a catalogue scraping pipeline
///
/// Websift fetches catalogue pages from the configured target sites,
/// extracts book and product records, persists them to SQLite, exports
/// CSV files, and reports run outcomes.
#[derive(Parser, Debug)]
#[command(name = "websift")]
#[command(version = "1.0.0")]
#[command(about = "A catalogue scraping pipeline", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every configured scrape job once and write the run report
    Run,

    /// Run a single target's scrape job
    Scrape {
        /// Target name ("books" or "products")
        target: String,
    },

    /// Export all configured targets' tables from the store to CSV
    Export,

    /// Show aggregate statistics from the store
    Stats,

    /// Run all jobs on the configured interval until interrupted
    Schedule,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    match cli.command {
        Command::Run => {
            let mut pipeline = Pipeline::new(config)?;
            let results = pipeline.run_all().await;

            let failed = results.values().filter(|passed| !**passed).count();
            if failed > 0 {
                anyhow::bail!("{} of {} jobs failed", failed, results.len());
            }
        }
        Command::Scrape { target } => {
            let mut pipeline = Pipeline::new(config)?;
            if !pipeline.run_job(&target).await {
                anyhow::bail!("scrape job for {} failed", target);
            }
        }
        Command::Export => {
            let pipeline = Pipeline::new(config)?;
            pipeline.export_all()?;
            println!("✓ Store tables exported");
        }
        Command::Stats => {
            let pipeline = Pipeline::new(config)?;
            print_run_stats(&pipeline.stats()?);
        }
        Command::Schedule => {
            let interval = Duration::from_secs(config.schedule.interval_hours * 3600);
            let mut pipeline = Pipeline::new(config)?;
            websift::schedule::run_on_interval(&mut pipeline, interval).await;
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("websift=info,warn"),
            1 => EnvFilter::new("websift=debug,info"),
            2 => EnvFilter::new("websift=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
