use chrono::Utc;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tokio::sync::watch;
use url::Url;

use crate::{
    client::WeatherService,
    enrich::{format_temperature, rewrite_icon_url},
    messages,
    store::KeyValueStore,
};

/// Store key for the query backing the current selection.
pub const SAVED_QUERY_KEY: &str = "saved_query";

/// Store key for the timestamp of the last successful commit. Written
/// beside the query and removed on clear; nothing reads it yet.
pub const LAST_UPDATED_KEY: &str = "last_updated";

const PLACEHOLDER: &str = "--";

/// Observable display state for the currently selected location.
///
/// `is_selected == false` with an `error_message` is the degraded display
/// after a failed fetch; with no message it is the initial unselected
/// state. Field defaults are the placeholder family the presentation layer
/// renders verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSnapshot {
    pub city_name: String,
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub uv_index: String,
    pub icon_url: Option<Url>,
    pub is_selected: bool,
    pub error_message: Option<String>,
}

impl Default for SelectionSnapshot {
    fn default() -> Self {
        Self {
            city_name: String::new(),
            temperature: PLACEHOLDER.to_string(),
            feels_like: PLACEHOLDER.to_string(),
            humidity: PLACEHOLDER.to_string(),
            uv_index: PLACEHOLDER.to_string(),
            icon_url: None,
            is_selected: false,
            error_message: None,
        }
    }
}

/// Owns the persisted-selection lifecycle: restore on start, fetch and
/// commit on success, reset on clear.
///
/// The persisted query is written only after a successful fetch and erased
/// only by [`SelectionStore::clear`]; a transient failure never destroys
/// the last known-good selection.
#[derive(Debug)]
pub struct SelectionStore {
    service: Arc<dyn WeatherService>,
    store: Arc<dyn KeyValueStore>,
    state: watch::Sender<SelectionSnapshot>,
    generation: AtomicU64,
}

impl SelectionStore {
    pub fn new(service: Arc<dyn WeatherService>, store: Arc<dyn KeyValueStore>) -> Self {
        let (state, _) = watch::channel(SelectionSnapshot::default());
        Self { service, store, state, generation: AtomicU64::new(0) }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SelectionSnapshot> {
        self.state.subscribe()
    }

    /// Current state snapshot.
    pub fn state(&self) -> SelectionSnapshot {
        self.state.borrow().clone()
    }

    /// The persisted query backing the selection, if any.
    pub fn saved_query(&self) -> Option<String> {
        match self.store.get(SAVED_QUERY_KEY) {
            Ok(v) => v.filter(|q| !q.trim().is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read saved query");
                None
            }
        }
    }

    /// Restore the remembered selection: if a query is persisted, fetch its
    /// weather; otherwise stay unselected.
    pub async fn restore_on_start(&self) {
        match self.saved_query() {
            Some(query) => {
                tracing::debug!(query = %query, "restoring saved selection");
                self.update_weather(&query).await;
            }
            None => {
                tracing::debug!("no saved selection to restore");
            }
        }
    }

    /// Fetch current weather for `query` and, on success, make it the
    /// committed selection.
    ///
    /// On failure the display degrades to unselected with a user message;
    /// the persisted value is left untouched, so a transient failure never
    /// erases the last known-good selection.
    pub async fn update_weather(&self, query: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let outcome = self.service.fetch_current_weather(query).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(query = %query, "discarding stale weather completion");
            return;
        }

        match outcome {
            Ok(snapshot) => {
                let display = SelectionSnapshot {
                    city_name: snapshot.location_name,
                    temperature: format_temperature(snapshot.temperature_f),
                    feels_like: format!("{}°", format_temperature(snapshot.feels_like_f)),
                    humidity: format!("{}%", snapshot.humidity_pct),
                    uv_index: format!("{}", snapshot.uv_index),
                    icon_url: rewrite_icon_url(&snapshot.condition_icon_ref),
                    is_selected: true,
                    error_message: None,
                };
                self.state.send_replace(display);
                self.commit(query);
            }
            Err(e) if e.is_connectivity() => {
                tracing::warn!(query = %query, error = %e, "no connectivity");
                self.degrade(messages::NO_CONNECTION);
            }
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "weather fetch failed");
                self.degrade(messages::FETCH_FAILED);
            }
        }
    }

    /// Forget the remembered selection and reset the display.
    pub fn clear(&self) {
        for key in [SAVED_QUERY_KEY, LAST_UPDATED_KEY] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!(key, error = %e, "failed to remove persisted entry");
            }
        }
        self.state.send_replace(SelectionSnapshot::default());
    }

    fn commit(&self, query: &str) {
        if let Err(e) = self.store.set(SAVED_QUERY_KEY, query) {
            tracing::warn!(error = %e, "failed to persist selection");
        }
        if let Err(e) = self.store.set(LAST_UPDATED_KEY, &Utc::now().to_rfc3339()) {
            tracing::warn!(error = %e, "failed to persist update timestamp");
        }
    }

    fn degrade(&self, message: &str) {
        self.state.send_replace(SelectionSnapshot {
            error_message: Some(message.to_string()),
            ..SelectionSnapshot::default()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_uses_placeholders() {
        let snap = SelectionSnapshot::default();
        assert_eq!(snap.city_name, "");
        assert_eq!(snap.temperature, "--");
        assert_eq!(snap.feels_like, "--");
        assert_eq!(snap.humidity, "--");
        assert_eq!(snap.uv_index, "--");
        assert!(snap.icon_url.is_none());
        assert!(!snap.is_selected);
        assert!(snap.error_message.is_none());
    }
}
