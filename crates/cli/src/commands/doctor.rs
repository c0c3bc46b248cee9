//! Doctor command - validate configuration and show status

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::args::DoctorArgs;
use crate::config::AppConfig;

#[derive(Debug, Serialize)]
struct DoctorReport {
    config: CheckResult,
    news: CheckResult,
    backend: CheckResult,
    overall: String,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    status: String,
    message: String,
    details: Option<serde_json::Value>,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            status: "warn".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    fn is_error(&self) -> bool {
        self.status == "error"
    }
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut report = DoctorReport {
        config: CheckResult::error("Not checked"),
        news: CheckResult::error("Not checked"),
        backend: CheckResult::error("Not checked"),
        overall: "error".to_string(),
    };

    match AppConfig::load(config_path.as_deref()) {
        Ok(config) => {
            report.config = match config.initial_params() {
                Ok(params) => CheckResult::ok("Configuration loaded successfully").with_details(
                    serde_json::json!({
                        "language": params.language,
                        "sortBy": params.sort_by.as_str(),
                        "pageSize": params.page_size,
                        "country": params.country,
                    }),
                ),
                Err(e) => CheckResult::error(format!("Invalid search defaults: {:#}", e)),
            };
            report.news = check_news(&config);
            report.backend = check_backend(&config);
        }
        Err(e) => {
            report.config = CheckResult::error(format!("Failed to load config: {:#}", e));
        }
    }

    report.overall = overall_status(&[&report.config, &report.news, &report.backend]);

    tracing::debug!(overall = %report.overall, "Doctor finished");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.overall == "error" {
        std::process::exit(1);
    }

    Ok(())
}

fn overall_status(checks: &[&CheckResult]) -> String {
    if checks.iter().any(|c| c.is_error()) {
        "error".to_string()
    } else if checks.iter().all(|c| c.is_ok()) {
        "ok".to_string()
    } else {
        "warn".to_string()
    }
}

fn check_news(config: &AppConfig) -> CheckResult {
    let news = &config.news;

    match news.provider.as_str() {
        "stub" => CheckResult::ok("Provider: stub (offline)"),
        "newsapi" => {
            if news.base_url.trim().is_empty() {
                return CheckResult::error("NewsAPI base_url is empty");
            }
            if news.api_key_env.trim().is_empty() {
                return CheckResult::error("No API key env var configured for newsapi");
            }

            // Only report whether the key is present, never its value
            if config.news_api_key().is_some() {
                CheckResult::ok(format!(
                    "Provider: newsapi, API key: {} (set)",
                    news.api_key_env
                ))
            } else {
                CheckResult::warn(format!(
                    "Provider: newsapi, API key: {} (not set)",
                    news.api_key_env
                ))
            }
        }
        other => CheckResult::error(format!("Unknown news provider: {}", other)),
    }
}

fn check_backend(config: &AppConfig) -> CheckResult {
    let backend = &config.backend;

    match backend.provider.as_str() {
        "stub" => CheckResult::ok("Provider: stub (offline heuristic)"),
        "http" => match config.backend_base_url() {
            Some(url) => CheckResult::ok(format!("Provider: http, URL: {}", url)),
            None => CheckResult::warn(format!(
                "Provider: http, URL not set (base_url or {})",
                backend.base_url_env
            )),
        },
        other => CheckResult::error(format!("Unknown backend provider: {}", other)),
    }
}

fn print_report(report: &DoctorReport) {
    println!("news-verdict Doctor Report");
    println!("==========================");
    println!();

    print_check("Config", &report.config);
    print_check("News Provider", &report.news);
    print_check("Classifier Backend", &report.backend);

    println!();
    println!(
        "{} Overall: {}",
        status_symbol(&report.overall),
        report.overall.to_uppercase()
    );

    if report.overall == "ok" {
        println!();
        println!("Ready to run! Try: news-verdict dashboard");
    }
}

fn print_check(name: &str, result: &CheckResult) {
    println!("{} {}: {}", status_symbol(&result.status), name, result.message);
}

fn status_symbol(status: &str) -> &'static str {
    match status {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stub_providers_are_ok() {
        let mut config = AppConfig::default();
        config.news.provider = "stub".to_string();
        config.backend.provider = "stub".to_string();

        assert!(check_news(&config).is_ok());
        assert!(check_backend(&config).is_ok());
    }

    #[test]
    fn test_missing_secrets_warn() {
        let mut config = AppConfig::default();
        config.news.api_key_env = "NEWS_VERDICT_TEST_UNSET_KEY".to_string();
        config.backend.base_url = None;
        config.backend.base_url_env = "NEWS_VERDICT_TEST_UNSET_URL".to_string();

        assert_eq!(check_news(&config).status, "warn");
        assert_eq!(check_backend(&config).status, "warn");
    }

    #[test]
    fn test_unknown_provider_is_error() {
        let mut config = AppConfig::default();
        config.news.provider = "rss".to_string();

        assert!(check_news(&config).is_error());
    }

    #[test]
    fn test_overall_status() {
        let ok = CheckResult::ok("fine");
        let warn = CheckResult::warn("hmm");
        let error = CheckResult::error("bad");

        assert_eq!(overall_status(&[&ok, &ok]), "ok");
        assert_eq!(overall_status(&[&ok, &warn]), "warn");
        assert_eq!(overall_status(&[&warn, &error]), "error");
    }
}
