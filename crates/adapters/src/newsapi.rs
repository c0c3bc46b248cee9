//! NewsAPI top-headlines adapter

use async_trait::async_trait;
use news_verdict_domain::{Article, NewsSource, NewsSourceError, SearchParams};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

/// Connection settings for the NewsAPI adapter
#[derive(Debug, Clone)]
pub struct NewsApiConfig {
    /// Provider API key; a missing key fails the first fetch
    pub api_key: Option<SecretString>,
    pub base_url: String,
    /// Request timeout in seconds (None = no timeout)
    pub timeout_secs: Option<u64>,
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

/// News source backed by `GET /top-headlines`
pub struct NewsApiSource {
    client: Client,
    config: NewsApiConfig,
}

impl NewsApiSource {
    pub fn new(config: NewsApiConfig) -> Result<Self, NewsSourceError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| NewsSourceError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn api_key(&self) -> Result<&str, NewsSourceError> {
        self.config
            .api_key
            .as_ref()
            .map(|key| key.expose_secret())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| NewsSourceError::Config("News API key is not configured".to_string()))
    }

    async fn request(&self, params: &SearchParams) -> Result<Vec<Article>, NewsSourceError> {
        let api_key = self.api_key()?;
        let url = format!(
            "{}/top-headlines",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .get(&url)
            .query(&query_params(api_key, params))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ProviderErrorBody>(&body)
                .ok()
                .and_then(|e| e.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

            return Err(NewsSourceError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let headlines: HeadlinesResponse = serde_json::from_str(&body)
            .map_err(|e| NewsSourceError::InvalidResponse(e.to_string()))?;

        headlines.articles.ok_or_else(|| {
            NewsSourceError::InvalidResponse("response has no articles field".to_string())
        })
    }
}

/// Query string for a search; empty optional fields are left out
fn query_params(api_key: &str, params: &SearchParams) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("apiKey", api_key.to_string()),
        ("pageSize", params.page_size.to_string()),
        ("page", params.page.to_string()),
        ("sortBy", params.sort_by.as_str().to_string()),
    ];

    if !params.language.trim().is_empty() {
        query.push(("language", params.language.trim().to_string()));
    }
    if let Some(country) = params
        .country
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        query.push(("country", country.to_string()));
    }
    if !params.query.trim().is_empty() {
        query.push(("q", params.query.trim().to_string()));
    }
    if !params.category.trim().is_empty() {
        query.push(("category", params.category.trim().to_string()));
    }

    query
}

fn map_transport_error(e: reqwest::Error) -> NewsSourceError {
    if e.is_builder() {
        NewsSourceError::Request(e.to_string())
    } else {
        NewsSourceError::Connectivity(e.to_string())
    }
}

#[derive(Deserialize)]
struct HeadlinesResponse {
    articles: Option<Vec<Article>>,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
}

#[async_trait]
impl NewsSource for NewsApiSource {
    async fn fetch_news(&self, params: &SearchParams) -> Result<Vec<Article>, NewsSourceError> {
        tracing::info!(
            query = %params.query,
            category = %params.category,
            country = ?params.country,
            page = params.page,
            "Fetching headlines from NewsAPI"
        );

        let articles = self
            .request(params)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error fetching news"))?;

        tracing::info!(count = articles.len(), "Fetched headlines");

        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use news_verdict_domain::SortBy;
    use std::collections::HashMap;
    use wiremock::matchers::{any, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source_for(server: &MockServer, key: Option<&str>) -> NewsApiSource {
        NewsApiSource::new(NewsApiConfig {
            api_key: key.map(|k| SecretString::new(k.into())),
            base_url: server.uri(),
            timeout_secs: Some(5),
        })
        .unwrap()
    }

    fn headlines_body() -> serde_json::Value {
        serde_json::json!({
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {
                    "source": {"id": "reuters", "name": "Reuters"},
                    "author": null,
                    "title": "A",
                    "description": "d",
                    "url": "u1",
                    "urlToImage": null,
                    "publishedAt": "2024-01-15T12:00:00Z",
                    "content": null
                },
                {
                    "title": "B",
                    "url": "u2"
                }
            ]
        })
    }

    async fn received_query(server: &MockServer) -> HashMap<String, String> {
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        requests[0]
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[tokio::test]
    async fn test_fetch_news_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/top-headlines"))
            .and(query_param("apiKey", "test-key"))
            .and(query_param("pageSize", "20"))
            .and(query_param("page", "1"))
            .and(query_param("sortBy", "publishedAt"))
            .and(query_param("language", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(headlines_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let source = source_for(&mock_server, Some("test-key"));
        let articles = source.fetch_news(&SearchParams::default()).await.unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "A");
        assert_eq!(articles[0].source.name, "Reuters");
        assert_eq!(articles[0].description.as_deref(), Some("d"));
        assert_eq!(articles[1].url, "u2");
        assert!(articles[1].is_fake.is_none());
    }

    #[tokio::test]
    async fn test_empty_query_and_category_are_omitted() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/top-headlines"))
            .respond_with(ResponseTemplate::new(200).set_body_json(headlines_body()))
            .mount(&mock_server)
            .await;

        let source = source_for(&mock_server, Some("test-key"));
        source.fetch_news(&SearchParams::default()).await.unwrap();

        let query = received_query(&mock_server).await;
        assert!(!query.contains_key("q"));
        assert!(!query.contains_key("category"));
        assert!(!query.contains_key("country"));
        assert_eq!(query.get("apiKey").map(String::as_str), Some("test-key"));
    }

    #[tokio::test]
    async fn test_filled_fields_are_sent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/top-headlines"))
            .respond_with(ResponseTemplate::new(200).set_body_json(headlines_body()))
            .mount(&mock_server)
            .await;

        let source = source_for(&mock_server, Some("test-key"));
        let params = SearchParams {
            query: "election".to_string(),
            category: "general".to_string(),
            country: Some("us".to_string()),
            sort_by: SortBy::Popularity,
            page_size: 5,
            page: 2,
            ..Default::default()
        };
        source.fetch_news(&params).await.unwrap();

        let query = received_query(&mock_server).await;
        assert_eq!(query.get("q").map(String::as_str), Some("election"));
        assert_eq!(query.get("category").map(String::as_str), Some("general"));
        assert_eq!(query.get("country").map(String::as_str), Some("us"));
        assert_eq!(query.get("sortBy").map(String::as_str), Some("popularity"));
        assert_eq!(query.get("pageSize").map(String::as_str), Some("5"));
        assert_eq!(query.get("page").map(String::as_str), Some("2"));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_request() {
        let mock_server = MockServer::start().await;

        Mock::given(any())
            .respond_with(ResponseTemplate::new(200).set_body_json(headlines_body()))
            .expect(0)
            .mount(&mock_server)
            .await;

        for key in [None, Some("   ")] {
            let source = source_for(&mock_server, key);
            let result = source.fetch_news(&SearchParams::default()).await;
            assert!(matches!(result, Err(NewsSourceError::Config(_))));
        }

        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_carries_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/top-headlines"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "status": "error",
                "code": "apiKeyInvalid",
                "message": "Your API key is invalid or incorrect."
            })))
            .mount(&mock_server)
            .await;

        let source = source_for(&mock_server, Some("bad-key"));
        let result = source.fetch_news(&SearchParams::default()).await;

        match result {
            Err(NewsSourceError::Provider { status, message }) => {
                assert_eq!(status, 401);
                assert!(message.contains("API key is invalid"));
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_provider_error_falls_back_to_status_text() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/top-headlines"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let source = source_for(&mock_server, Some("test-key"));
        let result = source.fetch_news(&SearchParams::default()).await;

        match result {
            Err(NewsSourceError::Provider { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_articles_field_is_invalid() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/top-headlines"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"status": "ok", "totalResults": 0})),
            )
            .mount(&mock_server)
            .await;

        let source = source_for(&mock_server, Some("test-key"));
        let result = source.fetch_news(&SearchParams::default()).await;

        assert!(matches!(result, Err(NewsSourceError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_connectivity_error() {
        let source = NewsApiSource::new(NewsApiConfig {
            api_key: Some(SecretString::new("test-key".into())),
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: Some(5),
        })
        .unwrap();

        let result = source.fetch_news(&SearchParams::default()).await;

        assert!(matches!(result, Err(NewsSourceError::Connectivity(_))));
    }

    #[tokio::test]
    async fn test_malformed_base_url_is_request_error() {
        let source = NewsApiSource::new(NewsApiConfig {
            api_key: Some(SecretString::new("test-key".into())),
            base_url: "not a url".to_string(),
            timeout_secs: None,
        })
        .unwrap();

        let result = source.fetch_news(&SearchParams::default()).await;

        assert!(matches!(result, Err(NewsSourceError::Request(_))));
    }
}
