//! Dashboard state machine
//!
//! Holds the current search parameters, the displayed articles and the
//! loading/error flags. Every user action starts a new cycle on a spawned
//! task; starting a cycle aborts the previous one, and completions from an
//! older generation are discarded, so the latest action always wins.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::{
    model::{Article, SearchParams, SearchUpdate, filter_by_label},
    ports::{Classifier, NewsSource},
    usecases::enrich::{CycleError, EnrichConfig, EnrichUseCase},
};

pub const LOAD_ERROR_MESSAGE: &str = "Error loading news articles. Please try again.";
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching news articles. Please try again.";

/// What started a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Mount,
    Search,
    FilterChange,
    Refresh,
}

impl Trigger {
    /// User-facing message shown when a cycle of this kind fails
    pub fn error_message(&self) -> &'static str {
        match self {
            Trigger::Mount => LOAD_ERROR_MESSAGE,
            Trigger::Search | Trigger::FilterChange | Trigger::Refresh => FETCH_ERROR_MESSAGE,
        }
    }
}

/// Everything the views render
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub params: SearchParams,
    /// Articles from the last successful cycle
    pub articles: Vec<Article>,
    pub loading: bool,
    pub error: Option<String>,
    /// Local keyword filter over `articles`
    pub label_filter: String,
}

impl DashboardState {
    /// Articles that pass the local keyword filter, in provider order
    pub fn visible_articles(&self) -> Vec<&Article> {
        filter_by_label(&self.articles, &self.label_filter)
    }
}

#[derive(Debug)]
struct CycleOutcome {
    generation: u64,
    trigger: Trigger,
    result: Result<Vec<Article>, CycleError>,
}

/// Controller owning the dashboard state
pub struct Dashboard {
    source: Arc<dyn NewsSource>,
    classifier: Arc<dyn Classifier>,
    config: EnrichConfig,
    state: DashboardState,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<CycleOutcome>,
    rx: mpsc::UnboundedReceiver<CycleOutcome>,
}

impl Dashboard {
    pub fn new(
        source: Arc<dyn NewsSource>,
        classifier: Arc<dyn Classifier>,
        config: EnrichConfig,
        params: SearchParams,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            classifier,
            config,
            state: DashboardState {
                params,
                ..Default::default()
            },
            generation: 0,
            in_flight: None,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Initial load with the current parameters
    pub fn mount(&mut self) {
        self.start_cycle(Trigger::Mount);
    }

    /// Replace the query and reload
    pub fn search(&mut self, query: impl Into<String>) {
        self.state.params = self.state.params.merged(SearchUpdate::query(query));
        self.start_cycle(Trigger::Search);
    }

    /// Merge a partial parameter set and reload
    pub fn change_filter(&mut self, update: SearchUpdate) {
        self.state.params = self.state.params.merged(update);
        self.start_cycle(Trigger::FilterChange);
    }

    /// Reload with unchanged parameters
    pub fn refresh(&mut self) {
        self.start_cycle(Trigger::Refresh);
    }

    /// Set the local keyword filter; no network call
    pub fn set_label_filter(&mut self, label: impl Into<String>) {
        self.state.label_filter = label.into();
    }

    fn start_cycle(&mut self, trigger: Trigger) {
        if let Some(previous) = self.in_flight.take() {
            if !previous.is_finished() {
                tracing::info!(
                    generation = self.generation,
                    "Cancelling superseded cycle"
                );
            }
            previous.abort();
        }

        self.generation += 1;
        self.state.loading = true;
        self.state.error = None;

        let generation = self.generation;
        let params = self.state.params.clone();
        let usecase = EnrichUseCase::new(
            Arc::clone(&self.source),
            Arc::clone(&self.classifier),
            self.config.clone(),
        );
        let tx = self.tx.clone();

        tracing::debug!(generation = generation, trigger = ?trigger, "Starting cycle");

        self.in_flight = Some(tokio::spawn(async move {
            let result = usecase.run(&params).await;
            // Receiver lives as long as the dashboard
            let _ = tx.send(CycleOutcome {
                generation,
                trigger,
                result,
            });
        }));
    }

    /// Wait for the next finished cycle and apply it.
    ///
    /// Returns whether the state changed. Cancel-safe, so it can sit in a
    /// `select!` next to input handling.
    pub async fn next_update(&mut self) -> bool {
        match self.rx.recv().await {
            Some(outcome) => self.apply(outcome),
            None => false,
        }
    }

    /// Apply every cycle that already finished, without waiting
    pub fn try_update(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.rx.try_recv() {
            changed |= self.apply(outcome);
        }
        changed
    }

    /// Wait until the latest cycle has been applied. Returns at once when idle.
    pub async fn settle(&mut self) {
        while self.state.loading {
            match self.rx.recv().await {
                Some(outcome) => {
                    self.apply(outcome);
                }
                None => break,
            }
        }
    }

    fn apply(&mut self, outcome: CycleOutcome) -> bool {
        if outcome.generation != self.generation {
            tracing::debug!(
                generation = outcome.generation,
                current = self.generation,
                "Discarding stale cycle result"
            );
            return false;
        }

        self.in_flight = None;
        self.state.loading = false;

        match outcome.result {
            Ok(articles) => {
                tracing::info!(count = articles.len(), "Articles updated");
                self.state.articles = articles;
                self.state.error = None;
            }
            Err(e) => {
                tracing::error!(error = %e, trigger = ?outcome.trigger, "Cycle failed");
                self.state.error = Some(outcome.trigger.error_message().to_string());
            }
        }

        true
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
