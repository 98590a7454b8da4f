//! Completion driver for a streamed query.
//!
//! DESIGN
//! ======
//! `drive` consumes decoded SSE payloads, hands `Data` and `Error` events to
//! the caller's callback, and resolves as soon as the stream reaches a
//! terminal message. `bounded` races the whole operation against the
//! stream timeout. Dropping the message stream closes the connection, so
//! every terminal path (complete, error, timeout, transport failure) closes
//! it simply by returning.
//!
//! ERROR HANDLING
//! ==============
//! Unparseable and partial messages are logged and skipped. A backend
//! `error` message resolves with `StreamOutcome::Failed`; transport failures
//! and premature end-of-stream return `ClientError` immediately.

#[cfg(test)]
#[path = "stream_test.rs"]
mod stream_test;

use std::future::Future;
use std::time::Duration;

use futures::{Stream, StreamExt};

use super::sse::SseDecoder;
use super::types::{ClientError, StreamEvent, StreamOutcome};

/// Turn a chunked byte stream into a stream of SSE message payloads.
pub fn sse_messages<S, B, E>(bytes: S) -> impl Stream<Item = Result<String, ClientError>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut decoder = SseDecoder::new();
    bytes.flat_map(move |chunk| {
        let items: Vec<Result<String, ClientError>> = match chunk {
            Ok(bytes) => decoder.feed(bytes.as_ref()).into_iter().map(Ok).collect(),
            Err(e) => vec![Err(ClientError::Transport(e.to_string()))],
        };
        futures::stream::iter(items)
    })
}

/// Pump `messages` until a terminal message arrives.
///
/// # Errors
///
/// Returns the first transport error, or `ClientError::StreamClosed` if the
/// stream ends before `complete` or `error`.
pub async fn drive<S, F>(mut messages: S, mut on_event: F) -> Result<StreamOutcome, ClientError>
where
    S: Stream<Item = Result<String, ClientError>> + Unpin,
    F: FnMut(StreamEvent),
{
    while let Some(message) = messages.next().await {
        let raw = message?;
        let event = match StreamEvent::parse(&raw) {
            Ok(Some(event)) => event,
            Ok(None) => {
                tracing::debug!("dropping incomplete data message");
                continue;
            }
            Err(e) => {
                tracing::warn!(error = %e, "unparseable stream message");
                continue;
            }
        };

        match event {
            StreamEvent::Complete => {
                tracing::debug!("stream complete");
                return Ok(StreamOutcome::Completed);
            }
            StreamEvent::Error { message } => {
                tracing::warn!(error = %message, "backend reported stream error");
                on_event(StreamEvent::Error { message: message.clone() });
                return Ok(StreamOutcome::Failed(message));
            }
            data @ StreamEvent::Data(_) => on_event(data),
        }
    }
    Err(ClientError::StreamClosed)
}

/// Race `fut` against `limit`. On expiry the future (and any connection it
/// owns) is dropped.
///
/// # Errors
///
/// Returns `ClientError::Timeout` when `limit` elapses first, otherwise
/// whatever `fut` returns.
pub async fn bounded<F>(limit: Duration, fut: F) -> Result<StreamOutcome, ClientError>
where
    F: Future<Output = Result<StreamOutcome, ClientError>>,
{
    if let Ok(result) = tokio::time::timeout(limit, fut).await {
        result
    } else {
        tracing::warn!(timeout_secs = limit.as_secs(), "stream timed out");
        Err(ClientError::Timeout { secs: limit.as_secs() })
    }
}
