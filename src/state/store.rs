//! The single store behind the dashboard.
//!
//! DESIGN
//! ======
//! `QueryStore` is constructed once per session and handed to whoever needs
//! it; there is no global instance. Every transition takes `&mut self`, runs
//! to completion, then notifies listeners with the resulting state, so a
//! listener never observes a half-applied update.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use super::query::{AiResponsePatch, DashboardState, HistoryEntry, QueryResults};

/// Handle returned by [`QueryStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&DashboardState) + Send + Sync>;

#[derive(Default)]
pub struct QueryStore {
    state: DashboardState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl std::fmt::Debug for QueryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl QueryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Register a listener called after every transition.
    pub fn subscribe(&mut self, listener: impl Fn(&DashboardState) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn commit(&mut self, apply: impl FnOnce(&mut DashboardState)) {
        apply(&mut self.state);
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    pub fn set_current_query(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.commit(|s| s.current_query = text);
    }

    /// Prepend to history. Duplicates are kept and the list is not capped.
    pub fn add_to_history(&mut self, entry: HistoryEntry) {
        self.commit(|s| s.history.insert(0, entry));
    }

    /// Remove the entry with `id`; a no-op when absent.
    pub fn remove_from_history(&mut self, id: &str) {
        self.commit(|s| s.history.retain(|entry| entry.id != id));
    }

    pub fn clear_history(&mut self) {
        self.commit(|s| s.history.clear());
    }

    pub fn set_results(&mut self, results: QueryResults) {
        self.commit(|s| s.results = results);
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.commit(|s| s.results.loading = loading);
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.commit(|s| s.results.error = error);
    }

    /// Shallow-merge `patch` into the AI response.
    pub fn set_ai_response(&mut self, patch: AiResponsePatch) {
        self.commit(|s| s.ai_response.merge(patch));
    }

    pub fn set_suggestions(&mut self, suggestions: Vec<String>) {
        self.commit(|s| s.suggestions = suggestions);
    }
}
