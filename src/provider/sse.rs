//! Incremental SSE decoding for chat-completion streams.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde::Deserialize;
use tracing::debug;

use crate::error::RelayError;
use crate::types::{StreamState, TextStream};

use super::http::sse_data;

/// What a single SSE line means for the text stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// A delta fragment (possibly empty).
    Delta(String),
    /// The `[DONE]` terminal marker.
    Done,
    /// A `data: ` payload that is not valid chunk JSON. Skipped, never fatal.
    Malformed(String),
    /// Comments, blank lines, and non-data fields.
    Ignored,
}

/// Classify one SSE line.
pub fn parse_sse_line(line: &str) -> SseEvent {
    let line = line.trim_end_matches('\r');
    let Some(data) = sse_data(line) else {
        return SseEvent::Ignored;
    };
    if data == "[DONE]" {
        return SseEvent::Done;
    }
    match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => SseEvent::Delta(
            chunk
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.delta)
                .and_then(|d| d.content)
                .unwrap_or_default(),
        ),
        Err(e) => SseEvent::Malformed(e.to_string()),
    }
}

/// Splits a byte stream into complete lines, holding back only the
/// trailing partial line between chunks.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: Vec<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk, returning every line it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            lines.push(String::from_utf8_lossy(&line[..line.len() - 1]).into_owned());
        }
        lines
    }

    /// Remaining partial line at end of input, if any.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buffer);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }
}

/// Turn an upstream SSE byte stream into a stream of text deltas.
///
/// Transport errors end the stream with an `Err` item. Malformed payloads
/// are counted and skipped.
pub fn delta_stream<S>(bytes: S) -> TextStream
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
{
    let stream = async_stream::stream! {
        let mut decoder = LineDecoder::new();
        let mut state = StreamState::new();
        futures::pin_mut!(bytes);

        let mut pending: Vec<String> = Vec::new();
        loop {
            match bytes.next().await {
                Some(Ok(chunk)) => pending.extend(decoder.push(&chunk)),
                Some(Err(e)) => {
                    yield Err(RelayError::Network(e));
                    break;
                }
                None => {
                    pending.extend(decoder.finish());
                    for line in pending.drain(..) {
                        if let Some(delta) = apply_line(&mut state, &line) {
                            yield Ok(delta);
                        }
                    }
                    break;
                }
            }
            for line in pending.drain(..) {
                if let Some(delta) = apply_line(&mut state, &line) {
                    yield Ok(delta);
                }
            }
        }

        debug!(
            fragments = state.fragments(),
            skipped = state.skipped(),
            chars = state.text().chars().count(),
            "stream exhausted"
        );
    };
    Box::pin(stream)
}

fn apply_line(state: &mut StreamState, line: &str) -> Option<crate::types::TextStreamDelta> {
    match parse_sse_line(line) {
        SseEvent::Delta(fragment) => state.push(&fragment),
        SseEvent::Malformed(reason) => {
            state.skip();
            debug!(
                error = %RelayError::MalformedStreamChunk(reason),
                line = %line,
                "skipping malformed SSE payload"
            );
            None
        }
        SseEvent::Done | SseEvent::Ignored => None,
    }
}

// OpenAI-compatible stream chunk (internal)

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Option<StreamDelta>,
}

#[derive(Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}
