//! HTTP client for the analytics backend.
//!
//! `QueryClient` is built once from `DashboardConfig` and injected wherever
//! it is needed; callers depend on the `AnalyticsBackend` trait so tests can
//! substitute a double. Cookies are kept in a per-client jar so every
//! request goes out with credentials.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use reqwest::Url;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use super::stream::{bounded, drive, sse_messages};
use super::types::{ClientError, StreamEvent, StreamOutcome, suggestions_from_body};
use crate::config::{DashboardConfig, Timeouts};

const JSON: &str = "application/json";
const EVENT_STREAM: &str = "text/event-stream";

// =============================================================================
// BACKEND TRAIT
// =============================================================================

/// The two operations the dashboard needs from the analytics service.
#[async_trait::async_trait]
pub trait AnalyticsBackend: Send + Sync {
    /// Stream one query, passing `Data` and `Error` events to `on_event`.
    async fn submit_query(
        &self,
        query: &str,
        on_event: &mut (dyn FnMut(StreamEvent) + Send),
    ) -> Result<StreamOutcome, ClientError>;

    /// Autocomplete suggestions for `query`. Failures yield an empty list.
    async fn fetch_suggestions(&self, query: &str) -> Vec<String>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct QueryClient {
    http: reqwest::Client,
    base_url: Url,
    timeouts: Timeouts,
}

impl QueryClient {
    /// Build a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute HTTP(S) URL or the
    /// HTTP client cannot be built.
    pub fn new(config: &DashboardConfig) -> Result<Self, ClientError> {
        let base_url = parse_base_url(&config.base_url)?;
        let http = reqwest::Client::builder()
            .connect_timeout(config.timeouts.connect)
            .cookie_store(true)
            .build()
            .map_err(|e| ClientError::HttpClientBuild(e.to_string()))?;

        tracing::info!(base_url = %base_url, "query client initialized");
        Ok(Self { http, base_url, timeouts: config.timeouts })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, path: &str, query: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        let prefix = self.base_url.path().trim_end_matches('/');
        url.set_path(&format!("{prefix}{path}"));
        url.set_query(None);
        if let Some(query) = query {
            url.query_pairs_mut().append_pair("query", query);
        }
        url
    }

    async fn open_and_drive(
        &self,
        query: &str,
        on_event: &mut (dyn FnMut(StreamEvent) + Send),
    ) -> Result<StreamOutcome, ClientError> {
        let url = self.endpoint("/api/process-query", Some(query));
        tracing::debug!(%url, "opening query stream");

        let response = self
            .http
            .get(url)
            .header(ACCEPT, EVENT_STREAM)
            .send()
            .await
            .map_err(|e| ClientError::Connect(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { status: status.as_u16() });
        }
        tracing::debug!("query stream opened");

        let messages = Box::pin(sse_messages(response.bytes_stream()));
        drive(messages, on_event).await
    }

    async fn is_reachable(&self) -> bool {
        let response = match self
            .http
            .get(self.endpoint("/", None))
            .header(ACCEPT, JSON)
            .timeout(self.timeouts.suggestion)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "backend health check failed");
                return false;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "backend health check failed");
            return false;
        }
        match response.json::<serde_json::Value>().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "backend health check returned non-JSON body");
                false
            }
        }
    }

    async fn request_suggestions(&self, query: &str) -> Option<Vec<String>> {
        let response = self
            .http
            .get(self.endpoint("/api/suggestions", Some(query)))
            .header(ACCEPT, JSON)
            .header(CONTENT_TYPE, JSON)
            .timeout(self.timeouts.suggestion)
            .send()
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "suggestions request failed"))
            .ok()?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "suggestions request failed");
            return None;
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "suggestions body is not JSON"))
            .ok()?;
        let suggestions = suggestions_from_body(&body);
        if suggestions.is_none() {
            tracing::warn!("suggestions body has no suggestions array");
        }
        suggestions
    }
}

#[async_trait::async_trait]
impl AnalyticsBackend for QueryClient {
    async fn submit_query(
        &self,
        query: &str,
        on_event: &mut (dyn FnMut(StreamEvent) + Send),
    ) -> Result<StreamOutcome, ClientError> {
        tracing::info!(query, "processing query");
        bounded(self.timeouts.stream, self.open_and_drive(query, on_event)).await
    }

    async fn fetch_suggestions(&self, query: &str) -> Vec<String> {
        if !self.is_reachable().await {
            return Vec::new();
        }
        let suggestions = self.request_suggestions(query).await.unwrap_or_default();
        tracing::debug!(query, count = suggestions.len(), "suggestions received");
        suggestions
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let invalid = |reason: String| ClientError::InvalidBaseUrl { url: raw.to_owned(), reason };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("not a base URL".to_owned()));
    }
    Ok(url)
}
