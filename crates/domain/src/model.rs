//! Domain models and value objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Outlet that published an article
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleSource {
    /// Provider-specific source ID, if any
    #[serde(default)]
    pub id: Option<String>,
    /// Display name of the outlet
    #[serde(default)]
    pub name: String,
}

/// A headline as returned by the news provider, optionally enriched
/// with a classification verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Headline
    pub title: String,
    /// Short summary / body used for classification
    #[serde(default)]
    pub description: Option<String>,
    /// Link to the full article
    pub url: String,
    /// Lead image URL
    #[serde(default)]
    pub url_to_image: Option<String>,
    /// Publication timestamp as sent by the provider
    #[serde(default)]
    pub published_at: String,
    /// Publishing outlet
    #[serde(default)]
    pub source: ArticleSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Verdict attached by enrichment; absent until classified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_fake: Option<bool>,
    /// Confidence percentage (0-100) attached by enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Article {
    /// Create an unclassified article with only the required fields set
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            url: url.into(),
            url_to_image: None,
            published_at: String::new(),
            source: ArticleSource::default(),
            author: None,
            content: None,
            is_fake: None,
            confidence: None,
        }
    }

    /// Text sent to the classifier alongside the title
    pub fn classification_body(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Attach a classification result to this article
    pub fn enrich(&mut self, classification: &Classification) {
        self.is_fake = classification.is_fake;
        self.confidence = classification.confidence;
    }

    pub fn verdict(&self) -> Verdict {
        match self.is_fake {
            Some(true) => Verdict::Fake,
            Some(false) => Verdict::Real,
            None => Verdict::Unclassified,
        }
    }

    /// Parsed publication time, when the provider sent a valid RFC 3339 value
    pub fn published(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::parse(&self.published_at, &Rfc3339).ok()
    }
}

/// Display form of an article's classification state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Fake,
    Real,
    Unclassified,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Fake => "Fake News",
            Verdict::Real => "Real News",
            Verdict::Unclassified => "Unclassified",
        }
    }
}

/// Sort order understood by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    Relevancy,
    Popularity,
    #[default]
    PublishedAt,
}

impl SortBy {
    pub const ALL: [SortBy; 3] = [SortBy::Relevancy, SortBy::Popularity, SortBy::PublishedAt];

    /// Provider wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevancy => "relevancy",
            SortBy::Popularity => "popularity",
            SortBy::PublishedAt => "publishedAt",
        }
    }

    /// The next sort key in display order, wrapping around
    pub fn next(&self) -> SortBy {
        match self {
            SortBy::Relevancy => SortBy::Popularity,
            SortBy::Popularity => SortBy::PublishedAt,
            SortBy::PublishedAt => SortBy::Relevancy,
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "relevancy" => Ok(SortBy::Relevancy),
            "popularity" => Ok(SortBy::Popularity),
            "publishedAt" | "published_at" => Ok(SortBy::PublishedAt),
            other => Err(format!(
                "Invalid sort key '{}': expected relevancy, popularity or publishedAt",
                other
            )),
        }
    }
}

/// Headline categories accepted by the provider
pub const CATEGORIES: [&str; 7] = [
    "business",
    "entertainment",
    "general",
    "health",
    "science",
    "sports",
    "technology",
];

/// Query sent to the news provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchParams {
    /// Free-text search term (empty = no term)
    pub query: String,
    /// Provider category (empty = all)
    pub category: String,
    /// Two-letter language code
    pub language: String,
    pub sort_by: SortBy,
    pub page_size: u32,
    /// 1-based page number
    pub page: u32,
    /// Two-letter country code
    pub country: Option<String>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: String::new(),
            language: "en".to_string(),
            sort_by: SortBy::PublishedAt,
            page_size: 20,
            page: 1,
            country: None,
        }
    }
}

impl SearchParams {
    /// Return a copy with every field present in `update` replaced
    pub fn merged(&self, update: SearchUpdate) -> Self {
        Self {
            query: update.query.unwrap_or_else(|| self.query.clone()),
            category: update.category.unwrap_or_else(|| self.category.clone()),
            language: update.language.unwrap_or_else(|| self.language.clone()),
            sort_by: update.sort_by.unwrap_or(self.sort_by),
            page_size: update.page_size.unwrap_or(self.page_size),
            page: update.page.unwrap_or(self.page),
            country: update.country.unwrap_or_else(|| self.country.clone()),
        }
    }

    /// The category after the current one in [`CATEGORIES`], with "" (all)
    /// between the last and the first
    pub fn next_category(&self) -> String {
        match CATEGORIES.iter().position(|c| *c == self.category) {
            Some(i) if i + 1 < CATEGORIES.len() => CATEGORIES[i + 1].to_string(),
            Some(_) => String::new(),
            None => CATEGORIES[0].to_string(),
        }
    }
}

/// Partial search parameters for a filter change
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchUpdate {
    pub query: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub sort_by: Option<SortBy>,
    pub page_size: Option<u32>,
    pub page: Option<u32>,
    /// `Some(None)` clears the country
    pub country: Option<Option<String>>,
}

impl SearchUpdate {
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }
}

/// Body sent to the classification backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub title: String,
    pub content: String,
}

/// Verdict returned by the classification backend.
///
/// Fields are optional because the backend response is not validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(default)]
    pub is_fake: Option<bool>,
    /// Confidence percentage (0-100)
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Classification {
    pub fn new(is_fake: bool, confidence: f64) -> Self {
        Self {
            is_fake: Some(is_fake),
            confidence: Some(confidence),
            explanation: None,
        }
    }
}

/// Keep articles whose title or description contains `label`,
/// ignoring case. An empty label keeps everything.
pub fn filter_by_label<'a>(articles: &'a [Article], label: &str) -> Vec<&'a Article> {
    let needle = label.trim().to_lowercase();
    if needle.is_empty() {
        return articles.iter().collect();
    }

    articles
        .iter()
        .filter(|article| {
            article.title.to_lowercase().contains(&needle)
                || article
                    .description
                    .as_ref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .collect()
}
