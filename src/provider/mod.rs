//! Upstream gateway: the seam between routing and the vendors' HTTP APIs.

pub mod gateway;
pub mod http;
pub mod sse;

pub use gateway::UpstreamGateway;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RelayError;
use crate::models::ProviderKey;
use crate::types::{ChatCompletion, ChatMessage, TextStream};

/// Sampling temperature used for every routed call.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
/// Token budget for non-streaming calls when the caller gives none.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
/// Token budget for streaming calls; not caller-configurable.
pub const STREAM_MAX_TOKENS: u32 = 2000;

/// A caller's conversation, before upstream shaping.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub system_prompt: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

impl ProviderRequest {
    pub fn new(system_prompt: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            messages,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// OpenAI-compatible `/chat/completions` request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionsRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
    pub stream: bool,
}

/// Core trait implemented by anything that can serve a routed chat call.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// One-shot completion.
    async fn invoke(
        &self,
        provider: ProviderKey,
        model: &str,
        request: &ProviderRequest,
    ) -> Result<ChatCompletion, RelayError>;

    /// Streamed completion. `request.max_tokens` is ignored in favor of
    /// [`STREAM_MAX_TOKENS`].
    async fn invoke_streaming(
        &self,
        provider: ProviderKey,
        model: &str,
        request: &ProviderRequest,
    ) -> Result<TextStream, RelayError>;
}
