//! Incremental server-sent events decoder.
//!
//! Bytes arrive in arbitrary chunks; `SseDecoder::feed` buffers partial
//! lines and returns the `data` of every message completed by the chunk.
//! Only unnamed and `message` events are surfaced, matching what a browser
//! `EventSource` delivers to `onmessage`.

#[cfg(test)]
#[path = "sse_test.rs"]
mod sse_test;

#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
    data: Option<String>,
    event: Option<String>,
}

impl SseDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and collect the payloads of completed messages.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut out = Vec::new();
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let line = String::from_utf8_lossy(&line);
            if let Some(message) = self.process_line(&line) {
                out.push(message);
            }
        }
        out
    }

    fn process_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "data" => match &mut self.data {
                Some(data) => {
                    data.push('\n');
                    data.push_str(value);
                }
                None => self.data = Some(value.to_owned()),
            },
            "event" => self.event = Some(value.to_owned()),
            // `id` and `retry` only matter for reconnection, which this client never does.
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<String> {
        let event = self.event.take();
        let data = self.data.take()?;
        match event.as_deref() {
            None | Some("" | "message") => Some(data),
            Some(other) => {
                tracing::debug!(event = other, "ignoring named SSE event");
                None
            }
        }
    }
}
