//! Config command - configuration management

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::args::{ConfigArgs, ConfigCommands};
use crate::config::AppConfig;

pub async fn execute(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Init { path, force } => init_config(&path, force),
    }
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    fs::write(path, AppConfig::example_toml())
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    tracing::debug!(path = %path.display(), "Wrote example config");

    println!("Created config file: {}", path.display());
    println!();
    println!("Next steps:");
    println!("  1. Export NEWS_API_KEY with your newsapi.org key");
    println!("  2. Export BACKEND_URL pointing at the classification service");
    println!("  3. Run 'news-verdict doctor' to validate your setup");
    println!("  4. Run 'news-verdict headlines' to test, then 'news-verdict dashboard'");

    Ok(())
}
