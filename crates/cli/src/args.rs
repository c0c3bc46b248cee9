//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use news_verdict_domain::SortBy;
use std::path::PathBuf;

/// news-verdict: check news headlines against a fake-news classifier
#[derive(Parser, Debug)]
#[command(name = "news-verdict")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive terminal dashboard
    Dashboard(DashboardArgs),

    /// Fetch and classify one page of headlines, then exit
    Headlines(HeadlinesArgs),

    /// One-shot classification of a title and body
    Classify(ClassifyArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Validate configuration and show status
    Doctor(DoctorArgs),
}

#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Initial search text
    #[arg(long)]
    pub query: Option<String>,

    /// Initial category
    #[arg(long)]
    pub category: Option<String>,

    /// Two-letter country code
    #[arg(long)]
    pub country: Option<String>,
}

#[derive(Args, Debug)]
pub struct HeadlinesArgs {
    /// Search text
    #[arg(long, short)]
    pub query: Option<String>,

    /// Category (business, entertainment, general, health, science, sports, technology)
    #[arg(long)]
    pub category: Option<String>,

    /// Two-letter language code
    #[arg(long)]
    pub language: Option<String>,

    /// Sort order (relevancy, popularity, publishedAt)
    #[arg(long, value_parser = parse_sort_by)]
    pub sort_by: Option<SortBy>,

    /// Articles per page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Page number, starting at 1
    #[arg(long)]
    pub page: Option<u32>,

    /// Two-letter country code
    #[arg(long)]
    pub country: Option<String>,

    /// Only show articles whose title or description contains this text
    #[arg(long)]
    pub filter: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Headline to classify
    #[arg(long)]
    pub title: String,

    /// Article body (defaults to empty)
    #[arg(long, default_value = "")]
    pub content: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init {
        /// Path to write config file
        #[arg(long, default_value = "./config.toml")]
        path: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_sort_by(value: &str) -> Result<SortBy, String> {
    value.parse()
}
