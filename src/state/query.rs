//! Query-side state: history entries, result set, AI response.
//!
//! DESIGN
//! ======
//! Plain data with documented defaults. Nothing here validates the shape of
//! what the backend sent; the store keeps whatever it is handed.

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::net::types::{ResultData, VisualizationSpec};

/// A past query. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub text: String,
    /// Submission time, epoch milliseconds.
    pub timestamp: i64,
}

impl HistoryEntry {
    /// New entry with a fresh id, stamped now.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4().to_string(), text: text.into(), timestamp: now_millis() }
    }
}

/// Current time as epoch milliseconds.
#[must_use]
pub fn now_millis() -> i64 {
    let nanos = time::OffsetDateTime::now_utc().unix_timestamp_nanos();
    i64::try_from(nanos / 1_000_000).unwrap_or(i64::MAX)
}

/// The last result set plus its request status.
///
/// `error` being set is terminal for the loading indicator even if
/// `loading` is still `true`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryResults {
    pub data: ResultData,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for QueryResults {
    fn default() -> Self {
        Self { data: ResultData::empty(), loading: false, error: None }
    }
}

impl QueryResults {
    /// Settled results carrying `data`.
    #[must_use]
    pub fn loaded(data: ResultData) -> Self {
        Self { data, loading: false, error: None }
    }

    /// Whether a spinner should be shown.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.loading && self.error.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AiResponse {
    pub data: ResultData,
    pub visualization: VisualizationSpec,
    pub insights: Vec<String>,
}

impl Default for AiResponse {
    fn default() -> Self {
        Self { data: ResultData::empty(), visualization: VisualizationSpec::default(), insights: Vec::new() }
    }
}

/// Fields to merge into an [`AiResponse`]; `None` keeps the prior value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AiResponsePatch {
    pub data: Option<ResultData>,
    pub visualization: Option<VisualizationSpec>,
    pub insights: Option<Vec<String>>,
}

impl AiResponse {
    /// Shallow merge: each field present in `patch` replaces the current one.
    pub fn merge(&mut self, patch: AiResponsePatch) {
        if let Some(data) = patch.data {
            self.data = data;
        }
        if let Some(visualization) = patch.visualization {
            self.visualization = visualization;
        }
        if let Some(insights) = patch.insights {
            self.insights = insights;
        }
    }
}

/// Everything the view layer observes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardState {
    pub current_query: String,
    pub suggestions: Vec<String>,
    /// Most recent first.
    pub history: Vec<HistoryEntry>,
    pub results: QueryResults,
    pub ai_response: AiResponse,
}

impl DashboardState {
    #[must_use]
    pub fn history_entry(&self, id: &str) -> Option<&HistoryEntry> {
        self.history.iter().find(|entry| entry.id == id)
    }
}
