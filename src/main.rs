//! CLI entry point for the harvester tool.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::Parser;
use harvester_core::config::load_file_config;
use harvester_core::{HarvestConfig, Harvester, build_resolver};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let mut config = HarvestConfig::default();
    if let Some(file) =
        load_file_config(args.config.as_deref()).context("failed to load config file")?
    {
        file.apply_to(&mut config);
    }
    args.apply_to(&mut config);
    config.validate().context("invalid configuration")?;

    let resolver = build_resolver(&config).context("failed to set up redirect resolver")?;
    let show_progress = !args.quiet && io::stderr().is_terminal();
    let harvester = Harvester::new(config, resolver)
        .context("failed to start harvester")?
        .with_progress(show_progress);

    let stats = harvester.run().await.context("harvest aborted")?;

    info!(
        written = stats.written(),
        skipped = stats.skipped(),
        failed = stats.failed(),
        total = stats.total(),
        "Harvest complete"
    );

    Ok(())
}
