//! User actions that bind a backend to the store.
//!
//! DESIGN
//! ======
//! The view layer calls these methods in response to input; each one is a
//! short sequence of store transitions around at most one backend call.
//! `submit` takes `&mut self`, so one dashboard never runs two queries at
//! once. Suggestion debouncing is left to the caller.
//!
//! ERROR HANDLING
//! ==============
//! Backend `error` messages land in `results.error` verbatim. Client
//! failures (timeout, transport) surface as a fixed user-facing message and
//! the detail goes to the log.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use crate::export::{ExportError, results_to_csv};
use crate::net::client::AnalyticsBackend;
use crate::net::types::{ClientError, StreamEvent, StreamOutcome, VisualizationSpec};
use crate::state::{AiResponsePatch, HistoryEntry, QueryResults, QueryStore};

pub const QUERY_FAILED_MESSAGE: &str = "Failed to process query";

/// Result of [`Dashboard::submit`].
#[derive(Debug)]
pub enum SubmitStatus {
    /// The query box was blank; nothing was sent.
    Skipped,
    /// The stream completed and the query was added to history.
    Completed(HistoryEntry),
    /// The backend reported an error mid-stream.
    Failed(String),
    /// The client gave up (timeout, transport, bad status).
    Aborted(ClientError),
}

pub struct Dashboard<B> {
    store: QueryStore,
    backend: B,
}

impl<B: AnalyticsBackend> Dashboard<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self::with_store(backend, QueryStore::new())
    }

    #[must_use]
    pub fn with_store(backend: B, store: QueryStore) -> Self {
        Self { store, backend }
    }

    #[must_use]
    pub fn store(&self) -> &QueryStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut QueryStore {
        &mut self.store
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    // =========================================================================
    // QUERY BOX
    // =========================================================================

    pub fn set_query_text(&mut self, text: impl Into<String>) {
        self.store.set_current_query(text);
    }

    /// Refresh suggestions for the current text. A blank query box clears
    /// them without asking the backend.
    pub async fn refresh_suggestions(&mut self) {
        let query = self.store.state().current_query.clone();
        if query.is_empty() {
            self.store.set_suggestions(Vec::new());
            return;
        }
        let suggestions = self.backend.fetch_suggestions(&query).await;
        self.store.set_suggestions(suggestions);
    }

    /// Default suggestions, as shown when the query box gains focus.
    pub async fn load_default_suggestions(&mut self) {
        let suggestions = self.backend.fetch_suggestions("").await;
        self.store.set_suggestions(suggestions);
    }

    pub fn select_suggestion(&mut self, suggestion: &str) {
        self.store.set_current_query(suggestion);
    }

    pub fn clear_input(&mut self) {
        self.store.set_current_query(String::new());
        self.store.set_suggestions(Vec::new());
    }

    // =========================================================================
    // HISTORY
    // =========================================================================

    /// Load a past query into the query box. Returns `false` for an unknown id.
    pub fn select_history(&mut self, id: &str) -> bool {
        let Some(text) = self.store.state().history_entry(id).map(|e| e.text.clone()) else {
            return false;
        };
        self.store.set_current_query(text);
        true
    }

    pub fn remove_history(&mut self, id: &str) {
        self.store.remove_from_history(id);
    }

    pub fn clear_history(&mut self) {
        self.store.clear_history();
    }

    // =========================================================================
    // RESULTS
    // =========================================================================

    pub fn clear_results(&mut self) {
        self.store.set_results(QueryResults::default());
        self.store.set_ai_response(AiResponsePatch {
            visualization: Some(VisualizationSpec::blank()),
            insights: Some(Vec::new()),
            ..AiResponsePatch::default()
        });
    }

    /// CSV text for the current results.
    ///
    /// # Errors
    ///
    /// Propagates CSV writer failures.
    pub fn export_csv(&self) -> Result<String, ExportError> {
        results_to_csv(&self.store.state().results.data)
    }

    /// Stream the current query into the store.
    pub async fn submit(&mut self) -> SubmitStatus {
        let query = self.store.state().current_query.trim().to_owned();
        if query.is_empty() {
            return SubmitStatus::Skipped;
        }
        // Stamped at submission; only recorded once the stream completes.
        let entry = HistoryEntry::new(query);

        self.store.set_loading(true);
        self.store.set_error(None);
        self.store.set_suggestions(Vec::new());

        let store = &mut self.store;
        let mut on_event = |event: StreamEvent| apply_event(store, event);
        let result = self.backend.submit_query(&entry.text, &mut on_event).await;

        match result {
            Ok(StreamOutcome::Completed) => {
                self.store.set_loading(false);
                self.store.add_to_history(entry.clone());
                tracing::info!(id = %entry.id, "query completed");
                SubmitStatus::Completed(entry)
            }
            Ok(StreamOutcome::Failed(message)) => SubmitStatus::Failed(message),
            Err(e) => {
                tracing::error!(error = %e, query = %entry.text, "query failed");
                self.store.set_error(Some(QUERY_FAILED_MESSAGE.to_owned()));
                self.store.set_loading(false);
                SubmitStatus::Aborted(e)
            }
        }
    }
}

fn apply_event(store: &mut QueryStore, event: StreamEvent) {
    match event {
        StreamEvent::Data(payload) => {
            store.set_results(QueryResults::loaded(payload.data));
            store.set_ai_response(AiResponsePatch {
                visualization: Some(payload.visualization),
                insights: Some(payload.insights),
                ..AiResponsePatch::default()
            });
        }
        StreamEvent::Error { message } => {
            store.set_error(Some(message));
            store.set_loading(false);
        }
        StreamEvent::Complete => store.set_loading(false),
    }
}
