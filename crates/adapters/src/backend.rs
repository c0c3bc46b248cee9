//! Classification backend adapter (`POST /classify`)

use async_trait::async_trait;
use news_verdict_domain::{Classification, ClassifyError, ClassifyRequest, Classifier};
use reqwest::Client;
use std::time::Duration;

/// Connection settings for the classification backend
#[derive(Debug, Clone, Default)]
pub struct BackendConfig {
    /// Base URL of the backend, e.g. `http://localhost:8000`
    pub base_url: Option<String>,
    /// Request timeout in seconds (None = no timeout)
    pub timeout_secs: Option<u64>,
}

/// Classifier that forwards each title/body pair to the backend
pub struct HttpClassifier {
    client: Client,
    base_url: Option<String>,
}

impl HttpClassifier {
    pub fn new(config: BackendConfig) -> Result<Self, ClassifyError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ClassifyError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    fn endpoint(&self) -> Result<String, ClassifyError> {
        let base_url = self
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                ClassifyError::Config("Backend base URL is not configured".to_string())
            })?;

        Ok(format!("{}/classify", base_url.trim_end_matches('/')))
    }

    async fn call_api(&self, title: &str, content: &str) -> Result<Classification, ClassifyError> {
        let url = self.endpoint()?;
        let request = ClassifyRequest {
            title: title.to_string(),
            content: content.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClassifyError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifyError::Api(format!(
                "Backend returned {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ClassifyError::InvalidFormat(e.to_string()))
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(
        &self,
        title: &str,
        content: &str,
    ) -> Result<Classification, ClassifyError> {
        tracing::debug!(title = %title, "Classifying article");

        self.call_api(title, content)
            .await
            .inspect_err(|e| tracing::error!(title = %title, error = %e, "Error classifying news"))
    }
}
