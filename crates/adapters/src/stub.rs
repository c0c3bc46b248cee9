//! Stub news source and classifier for testing and offline mode

use async_trait::async_trait;
use news_verdict_domain::{
    Article, ArticleSource, Classification, ClassifyError, Classifier, NewsSource,
    NewsSourceError, SearchParams,
};

/// Stub news source returning a fixed article list
pub struct StubNewsSource {
    articles: Vec<Article>,
}

impl StubNewsSource {
    /// A handful of built-in headlines
    pub fn sample() -> Self {
        Self {
            articles: sample_articles(),
        }
    }

    pub fn with_articles(articles: Vec<Article>) -> Self {
        Self { articles }
    }
}

impl Default for StubNewsSource {
    fn default() -> Self {
        Self::sample()
    }
}

#[async_trait]
impl NewsSource for StubNewsSource {
    async fn fetch_news(&self, params: &SearchParams) -> Result<Vec<Article>, NewsSourceError> {
        let query = params.query.trim().to_lowercase();
        let page_size = params.page_size.max(1) as usize;
        let skip = (params.page.max(1) as usize - 1) * page_size;

        Ok(self
            .articles
            .iter()
            .filter(|a| query.is_empty() || a.title.to_lowercase().contains(&query))
            .skip(skip)
            .take(page_size)
            .cloned()
            .collect())
    }
}

fn sample_articles() -> Vec<Article> {
    let entries = [
        (
            "Central bank holds interest rates steady",
            "Policy makers kept the benchmark rate unchanged for a third meeting.",
            "Reuters",
            "2024-01-15T12:00:00Z",
        ),
        (
            "SHOCKING: Miracle fruit cures every disease overnight",
            "You won't believe what doctors are hiding from you!!!",
            "Daily Buzz",
            "2024-01-15T11:30:00Z",
        ),
        (
            "City council approves new bike lanes",
            "The plan adds 40 km of protected lanes over two years.",
            "Local Times",
            "2024-01-15T10:05:00Z",
        ),
        (
            "Scientists confirm moon is made of cheese, sources say",
            "An anonymous insider leaked the secret they don't want you to know.",
            "Viral Wire",
            "2024-01-15T09:45:00Z",
        ),
    ];

    entries
        .iter()
        .enumerate()
        .map(|(i, (title, description, source, published_at))| {
            let mut article = Article::new(*title, format!("https://example.com/news/{}", i + 1));
            article.description = Some(description.to_string());
            article.published_at = published_at.to_string();
            article.source = ArticleSource {
                id: None,
                name: source.to_string(),
            };
            article
        })
        .collect()
}

/// Phrases the heuristic stub treats as signs of a fabricated story
const SENSATIONAL_MARKERS: [&str; 6] = [
    "shocking",
    "miracle",
    "you won't believe",
    "don't want you to know",
    "sources say",
    "!!!",
];

/// Stub classifier that returns configurable responses
pub struct StubClassifier {
    response: Option<Classification>,
    error: Option<ClassifyError>,
}

impl StubClassifier {
    /// Keyword heuristic: sensational phrasing is flagged as fake
    pub fn heuristic() -> Self {
        Self {
            response: None,
            error: None,
        }
    }

    /// Create a stub that returns a specific response
    pub fn with_response(response: Classification) -> Self {
        Self {
            response: Some(response),
            error: None,
        }
    }

    /// Create a stub that always returns an error
    pub fn with_error(error: ClassifyError) -> Self {
        Self {
            response: None,
            error: Some(error),
        }
    }
}

impl Default for StubClassifier {
    fn default() -> Self {
        Self::heuristic()
    }
}

#[async_trait]
impl Classifier for StubClassifier {
    async fn classify(
        &self,
        title: &str,
        content: &str,
    ) -> Result<Classification, ClassifyError> {
        if let Some(ref error) = self.error {
            return Err(match error {
                ClassifyError::Config(msg) => ClassifyError::Config(msg.clone()),
                ClassifyError::Api(msg) => ClassifyError::Api(msg.clone()),
                ClassifyError::Network(msg) => ClassifyError::Network(msg.clone()),
                ClassifyError::InvalidFormat(msg) => ClassifyError::InvalidFormat(msg.clone()),
            });
        }

        if let Some(ref response) = self.response {
            return Ok(response.clone());
        }

        let text = format!("{} {}", title, content).to_lowercase();
        let hits = SENSATIONAL_MARKERS
            .iter()
            .filter(|marker| text.contains(*marker))
            .count();

        let (is_fake, confidence) = if hits == 0 {
            (false, 80.0)
        } else {
            (true, (60.0 + 12.5 * hits as f64).min(99.0))
        };

        Ok(Classification {
            is_fake: Some(is_fake),
            confidence: Some(confidence),
            explanation: Some(format!(
                "Stub: {} sensational marker(s) found",
                hits
            )),
        })
    }
}
