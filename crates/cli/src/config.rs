//! Configuration loading and management

use anyhow::{Context, Result};
use news_verdict_domain::{SearchParams, SortBy, usecases::EnrichConfig};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub news: NewsConfig,

    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log destination while the terminal dashboard owns the screen
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Classification calls in flight per cycle (0 = one per article)
    #[serde(default)]
    pub max_concurrent: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    #[serde(default = "default_news_provider")]
    pub provider: String,

    #[serde(default = "default_news_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_news_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_sort_by")]
    pub sort_by: String,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_provider")]
    pub provider: String,

    /// Takes precedence over `base_url_env`
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_backend_url_env")]
    pub base_url_env: String,

    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("./news-verdict.log")
}

fn default_news_provider() -> String {
    "newsapi".to_string()
}

fn default_news_api_key_env() -> String {
    "NEWS_API_KEY".to_string()
}

fn default_news_base_url() -> String {
    news_verdict_adapters::newsapi::DEFAULT_BASE_URL.to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_sort_by() -> String {
    "publishedAt".to_string()
}

fn default_page_size() -> u32 {
    20
}

fn default_backend_provider() -> String {
    "http".to_string()
}

fn default_backend_url_env() -> String {
    "BACKEND_URL".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: default_log_file(),
            max_concurrent: 0,
        }
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            provider: default_news_provider(),
            api_key_env: default_news_api_key_env(),
            base_url: default_news_base_url(),
            timeout_secs: None,
            language: default_language(),
            sort_by: default_sort_by(),
            page_size: default_page_size(),
            country: None,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: default_backend_provider(),
            base_url: None,
            base_url_env: default_backend_url_env(),
            timeout_secs: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Add environment variable overrides
        builder = builder.add_source(
            config::Environment::with_prefix("NEWS_VERDICT")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Search parameters used for the first cycle
    pub fn initial_params(&self) -> Result<SearchParams> {
        let sort_by: SortBy = self
            .news
            .sort_by
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context("Invalid news.sort_by")?;

        Ok(SearchParams {
            language: self.news.language.clone(),
            sort_by,
            page_size: self.news.page_size.max(1),
            country: non_empty(self.news.country.as_deref()),
            ..Default::default()
        })
    }

    pub fn enrich_config(&self) -> EnrichConfig {
        EnrichConfig {
            max_concurrent: match self.general.max_concurrent {
                0 => None,
                n => Some(n),
            },
        }
    }

    /// News API key from the configured environment variable, if set
    pub fn news_api_key(&self) -> Option<SecretString> {
        read_env(&self.news.api_key_env).map(|key| SecretString::new(key.into()))
    }

    /// Backend URL from the config file, falling back to the configured
    /// environment variable
    pub fn backend_base_url(&self) -> Option<String> {
        non_empty(self.backend.base_url.as_deref()).or_else(|| read_env(&self.backend.base_url_env))
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# news-verdict configuration

[general]
log_level = "info"
# The dashboard writes logs here instead of the terminal
log_file = "./news-verdict.log"
# Classification calls in flight per cycle; 0 = one per article
max_concurrent = 0

[news]
provider = "newsapi"  # newsapi, stub
api_key_env = "NEWS_API_KEY"
base_url = "https://newsapi.org/v2"
# timeout_secs = 30
language = "en"
sort_by = "publishedAt"  # relevancy, popularity, publishedAt
page_size = 20
# country = "us"

[backend]
provider = "http"  # http, stub
# base_url = "http://localhost:8000"
base_url_env = "BACKEND_URL"
# timeout_secs = 30
"#
        .to_string()
    }
}

fn read_env(name: &str) -> Option<String> {
    if name.trim().is_empty() {
        return None;
    }
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
