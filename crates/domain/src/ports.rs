//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::model::{Article, Classification, SearchParams};

/// Error type for news source operations
#[derive(Debug, Error)]
pub enum NewsSourceError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Provider returned {status}: {message}")]
    Provider { status: u16, message: String },
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
    #[error("No response from provider: {0}")]
    Connectivity(String),
    #[error("Request error: {0}")]
    Request(String),
}

/// Port for fetching headlines from a news provider
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Fetch the articles matching the given search parameters
    async fn fetch_news(&self, params: &SearchParams) -> Result<Vec<Article>, NewsSourceError>;
}

/// Error type for classifier operations
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Backend error: {0}")]
    Api(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
}

/// Port for the fake-news classification backend
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify a title/body pair
    async fn classify(&self, title: &str, content: &str)
    -> Result<Classification, ClassifyError>;
}

#[async_trait]
impl<N: NewsSource + ?Sized> NewsSource for Arc<N> {
    async fn fetch_news(&self, params: &SearchParams) -> Result<Vec<Article>, NewsSourceError> {
        (**self).fetch_news(params).await
    }
}

#[async_trait]
impl<C: Classifier + ?Sized> Classifier for &C {
    async fn classify(
        &self,
        title: &str,
        content: &str,
    ) -> Result<Classification, ClassifyError> {
        (**self).classify(title, content).await
    }
}

#[async_trait]
impl<C: Classifier + ?Sized> Classifier for Arc<C> {
    async fn classify(
        &self,
        title: &str,
        content: &str,
    ) -> Result<Classification, ClassifyError> {
        (**self).classify(title, content).await
    }
}
