//! Wire types shared by the streaming query and suggestion endpoints.
//!
//! DESIGN
//! ======
//! Every SSE message is a JSON object with an optional `type` discriminant.
//! `error` and `complete` are control messages; anything else is a data
//! message, which is only surfaced when `data`, `visualization` and
//! `insights` arrive together.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by `QueryClient` operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The configured base URL is not a usable HTTP(S) URL.
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The stream connection could not be opened.
    #[error("stream connect failed: {0}")]
    Connect(String),

    /// The backend answered the stream request with a non-success status.
    #[error("stream request failed: status {status}")]
    Status { status: u16 },

    /// The connection failed after it was opened.
    #[error("stream transport failed: {0}")]
    Transport(String),

    /// The backend closed the stream without sending `complete`.
    #[error("stream closed before completion")]
    StreamClosed,

    /// No `complete` message arrived within the stream timeout.
    #[error("stream timed out after {secs}s")]
    Timeout { secs: u64 },
}

// =============================================================================
// RESULT DATA
// =============================================================================

/// Series returned for a query. `labels` and `values` are parallel; `growth`
/// and `target` are parallel to them when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultData {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Vec<f64>>,
}

impl ResultData {
    /// Empty series with empty (but present) growth and target columns.
    #[must_use]
    pub fn empty() -> Self {
        Self { labels: Vec::new(), values: Vec::new(), growth: Some(Vec::new()), target: Some(Vec::new()) }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// =============================================================================
// VISUALIZATION
// =============================================================================

/// Chart renderer picked by the backend. Kinds this client does not know
/// deserialize as `Other` and draw as a line chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Area,
    Bar,
    #[default]
    Line,
    Pie,
    #[serde(other)]
    Other,
}

impl ChartKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Area => "area",
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
            Self::Other => "other",
        }
    }

    /// The renderer to draw with.
    #[must_use]
    pub const fn renderer(self) -> Self {
        match self {
            Self::Other => Self::Line,
            kind => kind,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    #[default]
    Sum,
    Average,
    Count,
    Min,
    Max,
    #[serde(other)]
    Other,
}

impl Aggregation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Average => "average",
            Self::Count => "count",
            Self::Min => "min",
            Self::Max => "max",
            Self::Other => "other",
        }
    }
}

/// Backend-chosen presentation for a result set. Never validated client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualizationSpec {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metrics: Vec<String>,
    #[serde(default)]
    pub aggregation: Aggregation,
}

impl Default for VisualizationSpec {
    fn default() -> Self {
        Self {
            kind: ChartKind::Line,
            title: "Data Visualization".to_owned(),
            description: "Shows the data distribution".to_owned(),
            metrics: vec!["value".to_owned()],
            aggregation: Aggregation::Sum,
        }
    }
}

impl VisualizationSpec {
    /// Blank line chart used when results are cleared.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            kind: ChartKind::Line,
            title: String::new(),
            description: String::new(),
            metrics: Vec::new(),
            aggregation: Aggregation::Sum,
        }
    }
}

// =============================================================================
// STREAM EVENTS
// =============================================================================

/// A complete data message from the query stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiPayload {
    pub data: ResultData,
    pub visualization: VisualizationSpec,
    pub insights: Vec<String>,
}

/// One parsed message from the query stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Data(AiPayload),
    Error { message: String },
    Complete,
}

/// How a streamed query ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamOutcome {
    /// The backend sent `complete`.
    Completed,
    /// The backend sent an `error` message; the payload is its `content`.
    Failed(String),
}

/// Why a message produced no event.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("message is not a JSON object")]
    NotAnObject,
}

const FALLBACK_ERROR_MESSAGE: &str = "stream error";

impl StreamEvent {
    /// Parse one SSE message body.
    ///
    /// Returns `Ok(None)` for data messages missing any of `data`,
    /// `visualization` or `insights`, or whose fields do not deserialize.
    ///
    /// # Errors
    ///
    /// Returns an error when the body is not a JSON object.
    pub fn parse(raw: &str) -> Result<Option<Self>, MessageError> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Object(mut obj) = value else {
            return Err(MessageError::NotAnObject);
        };

        match obj.get("type").and_then(Value::as_str) {
            Some("complete") => return Ok(Some(Self::Complete)),
            Some("error") => {
                let message = obj
                    .get("content")
                    .and_then(Value::as_str)
                    .unwrap_or(FALLBACK_ERROR_MESSAGE)
                    .to_owned();
                return Ok(Some(Self::Error { message }));
            }
            _ => {}
        }

        let (Some(data), Some(visualization), Some(insights)) = (
            take_present(&mut obj, "data"),
            take_present(&mut obj, "visualization"),
            take_present(&mut obj, "insights"),
        ) else {
            return Ok(None);
        };

        let payload = serde_json::from_value::<ResultData>(data).and_then(|data| {
            Ok(AiPayload {
                data,
                visualization: serde_json::from_value(visualization)?,
                insights: serde_json::from_value(insights)?,
            })
        });
        match payload {
            Ok(payload) => Ok(Some(Self::Data(payload))),
            Err(e) => {
                tracing::warn!(error = %e, "dropping malformed data message");
                Ok(None)
            }
        }
    }
}

fn take_present(obj: &mut serde_json::Map<String, Value>, key: &str) -> Option<Value> {
    obj.remove(key).filter(|v| !v.is_null())
}

// =============================================================================
// SUGGESTIONS
// =============================================================================

/// Pull the `suggestions` array out of a response body. Non-string entries
/// are skipped; a missing or non-array field yields `None`.
#[must_use]
pub fn suggestions_from_body(body: &Value) -> Option<Vec<String>> {
    let items = body.get("suggestions")?.as_array()?;
    Some(items.iter().filter_map(Value::as_str).map(str::to_owned).collect())
}
