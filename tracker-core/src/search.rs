use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tokio::sync::watch;

use crate::{
    client::WeatherService,
    enrich::entry_from,
    error::ClientError,
    messages,
    model::SearchResultEntry,
};

/// Observable search state consumed by the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub search_text: String,
    /// Enriched entries in provider relevance order; never re-sorted.
    pub results: Vec<SearchResultEntry>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

/// Drives a free-text search: resolve candidates, enrich each with its
/// current weather, publish the assembled state.
///
/// All state writes go through the watch sender; a generation counter
/// ensures a completion from a superseded search never overwrites the
/// state of a newer one.
#[derive(Debug)]
pub struct SearchOrchestrator {
    service: Arc<dyn WeatherService>,
    state: watch::Sender<SearchState>,
    generation: AtomicU64,
}

impl SearchOrchestrator {
    pub fn new(service: Arc<dyn WeatherService>) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self { service, state, generation: AtomicU64::new(0) }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Current state snapshot.
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn set_search_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_modify(|s| s.search_text = text);
    }

    /// Run the search for the current `search_text`.
    ///
    /// No-op when the text is empty. The loading flag is set for the whole
    /// operation and reset on every exit path; enrichment is sequential in
    /// candidate order and fail-fast: the first failure discards all
    /// already-enriched entries.
    pub async fn perform_search(&self) {
        let text = self.state.borrow().search_text.trim().to_string();
        if text.is_empty() {
            return;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| s.is_loading = true);

        let outcome = self.run_search(&text).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            // A newer search owns the state now; it resets the loading flag.
            tracing::debug!(search_text = %text, "discarding stale search completion");
            return;
        }

        self.state.send_modify(|s| {
            s.is_loading = false;
            match outcome {
                Ok(entries) if entries.is_empty() => {
                    tracing::debug!(search_text = %text, "search returned no candidates");
                    s.error_message = Some(messages::no_results(&text));
                    s.results = Vec::new();
                }
                Ok(entries) => {
                    s.error_message = None;
                    s.results = entries;
                }
                Err(e) => {
                    tracing::warn!(search_text = %text, error = %e, "search failed");
                    s.error_message = Some(if e.is_connectivity() {
                        messages::NO_CONNECTION.to_string()
                    } else {
                        messages::SEARCH_FAILED.to_string()
                    });
                    s.results = Vec::new();
                }
            }
        });
    }

    async fn run_search(&self, text: &str) -> Result<Vec<SearchResultEntry>, ClientError> {
        let candidates = self.service.search_locations(text).await?;

        let mut entries = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let snapshot =
                self.service.fetch_current_weather(&candidate.coordinate_query()).await?;
            entries.push(entry_from(candidate, snapshot));
        }

        Ok(entries)
    }
}
