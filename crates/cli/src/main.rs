//! news-verdict CLI entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod args;
mod commands;
mod config;
mod ui;

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = cli.log_level.as_deref().unwrap_or("info");
    match &cli.command {
        Commands::Dashboard(_) => {
            // The terminal belongs to the dashboard, so logs go to a file
            let config = config::AppConfig::load(cli.config.as_deref()).unwrap_or_default();
            let level = cli
                .log_level
                .as_deref()
                .unwrap_or(&config.general.log_level);
            init_file_logging(level, &config.general.log_file)?;
        }
        _ => init_logging(log_level)?,
    }

    // Execute command
    match cli.command {
        Commands::Dashboard(args) => commands::dashboard::execute(args, cli.config).await,
        Commands::Headlines(args) => commands::headlines::execute(args, cli.config).await,
        Commands::Classify(args) => commands::classify::execute(args, cli.config).await,
        Commands::Config(args) => commands::config::execute(args).await,
        Commands::Doctor(args) => commands::doctor::execute(args, cli.config).await,
    }
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn init_file_logging(level: &str, path: &Path) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file)),
        )
        .with(filter)
        .init();

    Ok(())
}
