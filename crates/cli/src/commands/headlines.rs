//! Headlines command - one fetch-and-classify cycle without the dashboard

use anyhow::{Context, Result, bail};
use news_verdict_adapters::{NewsApiConfig, NewsApiSource, StubNewsSource};
use news_verdict_domain::{
    Article, NewsSource, SearchParams, SearchUpdate, filter_by_label, usecases::EnrichUseCase,
};
use std::path::PathBuf;
use std::sync::Arc;

use crate::args::HeadlinesArgs;
use crate::commands::classify::build_classifier;
use crate::config::{AppConfig, non_empty};
use crate::ui;

pub async fn execute(args: HeadlinesArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let params = params_from_args(config.initial_params()?, &args);

    let source = build_news_source(&config)?;
    let classifier = build_classifier(&config)?;
    let usecase = EnrichUseCase::new(source, classifier, config.enrich_config());

    let articles = usecase
        .run(&params)
        .await
        .context("Failed to load headlines")?;

    let visible = filter_by_label(&articles, args.filter.as_deref().unwrap_or(""));

    tracing::info!(
        fetched = articles.len(),
        shown = visible.len(),
        "Headlines ready"
    );

    if args.json {
        let json = serde_json::to_string_pretty(&visible).context("Failed to serialize output")?;
        println!("{}", json);
    } else {
        print_articles(&visible);
    }

    Ok(())
}

pub(crate) fn build_news_source(config: &AppConfig) -> Result<Arc<dyn NewsSource>> {
    match config.news.provider.as_str() {
        "newsapi" => {
            if config.news_api_key().is_none() {
                tracing::warn!(
                    env_var = %config.news.api_key_env,
                    "News API key is not set; fetching will fail"
                );
            }
            let source = NewsApiSource::new(NewsApiConfig {
                api_key: config.news_api_key(),
                base_url: config.news.base_url.clone(),
                timeout_secs: config.news.timeout_secs,
            })
            .context("Failed to configure news provider")?;
            Ok(Arc::new(source))
        }
        "stub" => Ok(Arc::new(StubNewsSource::sample())),
        other => bail!("Unknown news provider: {}", other),
    }
}

fn params_from_args(base: SearchParams, args: &HeadlinesArgs) -> SearchParams {
    base.merged(SearchUpdate {
        query: args.query.clone(),
        category: args.category.clone(),
        language: args.language.clone(),
        sort_by: args.sort_by,
        page_size: args.page_size.map(|n| n.max(1)),
        page: args.page.map(|n| n.max(1)),
        country: args.country.as_deref().map(|c| non_empty(Some(c))),
    })
}

fn print_articles(articles: &[&Article]) {
    println!("Today's Headlines");
    println!("=================");
    println!();

    if articles.is_empty() {
        println!("No articles found.");
        return;
    }

    for (i, article) in articles.iter().enumerate() {
        println!("{}. {}", i + 1, article.title);
        if let Some(ref description) = article.description {
            println!("   {}", description);
        }
        if let Some(badge) = ui::verdict_line(article) {
            println!("   [{}]", badge);
        }
        if !article.source.name.is_empty() {
            println!("   Source: {}", article.source.name);
        }
        println!("   {}", article.url);
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use news_verdict_domain::SortBy;

    fn empty_args() -> HeadlinesArgs {
        HeadlinesArgs {
            query: None,
            category: None,
            language: None,
            sort_by: None,
            page_size: None,
            page: None,
            country: None,
            filter: None,
            json: false,
        }
    }

    #[test]
    fn test_params_from_args_keeps_config_defaults() {
        let base = SearchParams {
            country: Some("gb".to_string()),
            ..Default::default()
        };

        let params = params_from_args(base.clone(), &empty_args());

        assert_eq!(params, base);
    }

    #[test]
    fn test_params_from_args_overrides() {
        let args = HeadlinesArgs {
            query: Some("vaccine".to_string()),
            sort_by: Some(SortBy::Relevancy),
            page_size: Some(0),
            country: Some("".to_string()),
            ..empty_args()
        };

        let base = SearchParams {
            country: Some("gb".to_string()),
            ..Default::default()
        };
        let params = params_from_args(base, &args);

        assert_eq!(params.query, "vaccine");
        assert_eq!(params.sort_by, SortBy::Relevancy);
        assert_eq!(params.page_size, 1);
        assert!(params.country.is_none());
    }

    #[test]
    fn test_build_news_source_rejects_unknown_provider() {
        let mut config = AppConfig::default();
        config.news.provider = "rss".to_string();

        assert!(build_news_source(&config).is_err());
    }
}
