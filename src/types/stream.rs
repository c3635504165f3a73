//! Streaming types.

use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// A lazily consumed sequence of text deltas. The stream ending is completion.
pub type TextStream = BoxStream<'static, Result<TextStreamDelta, RelayError>>;

/// One non-empty fragment emitted during streaming.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextStreamDelta {
    /// The incremental text chunk.
    pub text: String,
    /// Everything received so far, this fragment included.
    pub accumulated: String,
}

/// Per-call accumulator for an in-flight stream.
#[derive(Debug, Default, Clone)]
pub struct StreamState {
    text: String,
    fragments: usize,
    skipped: usize,
}

impl StreamState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment. Empty fragments are ignored and yield `None`.
    pub fn push(&mut self, fragment: &str) -> Option<TextStreamDelta> {
        if fragment.is_empty() {
            return None;
        }
        self.text.push_str(fragment);
        self.fragments += 1;
        Some(TextStreamDelta {
            text: fragment.to_string(),
            accumulated: self.text.clone(),
        })
    }

    /// Record a payload that could not be parsed.
    pub fn skip(&mut self) {
        self.skipped += 1;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn fragments(&self) -> usize {
        self.fragments
    }

    /// Number of malformed payloads skipped.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Final result after consuming a text stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamTextResult {
    /// Full accumulated text.
    pub text: String,
    /// Number of deltas received.
    pub fragments: usize,
}
