//! Networking modules for the analytics backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `client` owns the HTTP connection and the `AnalyticsBackend` seam,
//! `stream` drives one SSE query to completion, `sse` decodes the raw event
//! stream, and `types` defines the wire schema.

pub mod client;
pub mod sse;
pub mod stream;
pub mod types;

pub use client::{AnalyticsBackend, QueryClient};
pub use types::{AiPayload, Aggregation, ChartKind, ClientError, ResultData, StreamEvent, StreamOutcome, VisualizationSpec};
