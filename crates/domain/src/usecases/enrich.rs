//! Fetch-then-classify cycle

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};

use crate::{
    model::{Article, Classification, SearchParams},
    ports::{Classifier, ClassifyError, NewsSource, NewsSourceError},
};

/// Configuration for the enrichment cycle
#[derive(Debug, Clone, Default)]
pub struct EnrichConfig {
    /// Maximum classification calls in flight (None = one per article)
    pub max_concurrent: Option<usize>,
}

/// Errors that abort a cycle
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("Fetching news failed: {0}")]
    News(#[from] NewsSourceError),
    #[error("Classification failed: {0}")]
    Classify(#[from] ClassifyError),
}

/// Use case that fetches headlines and attaches a verdict to each one
pub struct EnrichUseCase<S, C> {
    source: S,
    classifier: C,
    config: EnrichConfig,
}

type ClassifyTask<'a> = BoxFuture<'a, (usize, Result<Classification, ClassifyError>)>;

impl<S: NewsSource, C: Classifier> EnrichUseCase<S, C> {
    pub fn new(source: S, classifier: C, config: EnrichConfig) -> Self {
        Self {
            source,
            classifier,
            config,
        }
    }

    /// Run one cycle: fetch, classify every article, merge the verdicts.
    ///
    /// All-or-nothing: the first classification failure drops every
    /// outstanding call and no article is returned.
    pub async fn run(&self, params: &SearchParams) -> Result<Vec<Article>, CycleError> {
        tracing::info!(
            query = %params.query,
            category = %params.category,
            page = params.page,
            page_size = params.page_size,
            "Fetching headlines"
        );

        let mut articles = self.source.fetch_news(params).await?;

        tracing::info!(count = articles.len(), "Fetched articles, classifying");

        let classifications = self.classify_all(&articles).await?;
        for (article, classification) in articles.iter_mut().zip(&classifications) {
            article.enrich(classification);
        }

        tracing::debug!(
            fake = articles.iter().filter(|a| a.is_fake == Some(true)).count(),
            total = articles.len(),
            "Enrichment complete"
        );

        Ok(articles)
    }

    async fn classify_all(&self, articles: &[Article]) -> Result<Vec<Classification>, ClassifyError> {
        let limit = self
            .config
            .max_concurrent
            .filter(|n| *n > 0)
            .unwrap_or(articles.len())
            .max(1);

        let mut results: Vec<Option<Classification>> = vec![None; articles.len()];
        let mut tasks: FuturesUnordered<ClassifyTask<'_>> = FuturesUnordered::new();
        let mut pending = articles.iter().enumerate();

        for (index, article) in pending.by_ref().take(limit) {
            tasks.push(self.classify_one(index, article));
        }

        while let Some((index, result)) = tasks.next().await {
            match result {
                Ok(classification) => results[index] = Some(classification),
                Err(e) => {
                    tracing::warn!(
                        index = index,
                        in_flight = tasks.len(),
                        error = %e,
                        "Classification failed, abandoning batch"
                    );
                    return Err(e);
                }
            }

            if let Some((index, article)) = pending.next() {
                tasks.push(self.classify_one(index, article));
            }
        }

        Ok(results.into_iter().flatten().collect())
    }

    fn classify_one<'a>(&'a self, index: usize, article: &'a Article) -> ClassifyTask<'a> {
        Box::pin(async move {
            let result = self
                .classifier
                .classify(&article.title, article.classification_body())
                .await;
            (index, result)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeNewsSource {
        articles: Vec<Article>,
    }

    #[async_trait]
    impl NewsSource for FakeNewsSource {
        async fn fetch_news(
            &self,
            _params: &SearchParams,
        ) -> Result<Vec<Article>, NewsSourceError> {
            Ok(self.articles.clone())
        }
    }

    struct FailingNewsSource;

    #[async_trait]
    impl NewsSource for FailingNewsSource {
        async fn fetch_news(
            &self,
            _params: &SearchParams,
        ) -> Result<Vec<Article>, NewsSourceError> {
            Err(NewsSourceError::Connectivity("connection refused".to_string()))
        }
    }

    /// Answers by title; fails for titles listed in `fail_on`
    struct ScriptedClassifier {
        answers: HashMap<String, Classification>,
        fail_on: Vec<String>,
        calls: AtomicUsize,
        seen: Mutex<Vec<(String, String)>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl ScriptedClassifier {
        fn new(answers: Vec<(&str, Classification)>) -> Self {
            Self {
                answers: answers
                    .into_iter()
                    .map(|(t, c)| (t.to_string(), c))
                    .collect(),
                fail_on: vec![],
                calls: AtomicUsize::new(0),
                seen: Mutex::new(vec![]),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Classifier for ScriptedClassifier {
        async fn classify(
            &self,
            title: &str,
            content: &str,
        ) -> Result<Classification, ClassifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .push((title.to_string(), content.to_string()));

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail_on.iter().any(|t| t == title) {
                return Err(ClassifyError::Api("backend returned 500".to_string()));
            }
            Ok(self.answers.get(title).cloned().unwrap_or_default())
        }
    }

    fn scenario_articles() -> Vec<Article> {
        let mut a = Article::new("A", "u1");
        a.description = Some("d".to_string());
        vec![a, Article::new("B", "u2")]
    }

    #[tokio::test]
    async fn test_run_merges_verdicts_in_provider_order() {
        let source = FakeNewsSource {
            articles: scenario_articles(),
        };
        let classifier = ScriptedClassifier::new(vec![
            ("A", Classification::new(true, 87.0)),
            ("B", Classification::new(false, 95.0)),
        ]);
        let usecase = EnrichUseCase::new(source, &classifier, EnrichConfig::default());

        let articles = usecase.run(&SearchParams::default()).await.unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "A");
        assert_eq!(articles[0].is_fake, Some(true));
        assert_eq!(articles[0].confidence, Some(87.0));
        assert_eq!(articles[1].title, "B");
        assert_eq!(articles[1].is_fake, Some(false));
        assert_eq!(articles[1].confidence, Some(95.0));

        // Missing description is sent as an empty body
        let seen = classifier.seen.lock().unwrap().clone();
        assert!(seen.contains(&("A".to_string(), "d".to_string())));
        assert!(seen.contains(&("B".to_string(), String::new())));
    }

    #[tokio::test]
    async fn test_one_classification_per_article() {
        let articles: Vec<Article> = (0..20)
            .map(|i| Article::new(format!("title {}", i), format!("u{}", i)))
            .collect();
        let source = FakeNewsSource { articles };
        let classifier = ScriptedClassifier::new(vec![]);
        let usecase = EnrichUseCase::new(source, &classifier, EnrichConfig::default());

        let result = usecase.run(&SearchParams::default()).await.unwrap();

        assert_eq!(result.len(), 20);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 20);
    }

    #[tokio::test]
    async fn test_empty_response_issues_no_classification() {
        let source = FakeNewsSource { articles: vec![] };
        let classifier = ScriptedClassifier::new(vec![]);
        let usecase = EnrichUseCase::new(source, &classifier, EnrichConfig::default());

        let result = usecase.run(&SearchParams::default()).await.unwrap();

        assert!(result.is_empty());
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_single_failure_aborts_whole_batch() {
        let source = FakeNewsSource {
            articles: scenario_articles(),
        };
        let mut classifier = ScriptedClassifier::new(vec![("A", Classification::new(true, 87.0))]);
        classifier.fail_on = vec!["B".to_string()];
        let usecase = EnrichUseCase::new(source, &classifier, EnrichConfig::default());

        let result = usecase.run(&SearchParams::default()).await;

        assert!(matches!(result, Err(CycleError::Classify(ClassifyError::Api(_)))));
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_classification() {
        let classifier = ScriptedClassifier::new(vec![]);
        let usecase = EnrichUseCase::new(FailingNewsSource, &classifier, EnrichConfig::default());

        let result = usecase.run(&SearchParams::default()).await;

        assert!(matches!(
            result,
            Err(CycleError::News(NewsSourceError::Connectivity(_)))
        ));
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_max_concurrent_caps_in_flight_calls() {
        let articles: Vec<Article> = (0..10)
            .map(|i| Article::new(format!("t{}", i), format!("u{}", i)))
            .collect();
        let source = FakeNewsSource { articles };
        let classifier = ScriptedClassifier::new(vec![]);
        let usecase = EnrichUseCase::new(
            source,
            &classifier,
            EnrichConfig {
                max_concurrent: Some(3),
            },
        );

        let result = usecase.run(&SearchParams::default()).await.unwrap();

        assert_eq!(result.len(), 10);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 10);
        assert!(classifier.max_in_flight.load(Ordering::SeqCst) <= 3);
    }
}
