//! Route a call, invoke it, and fall back once on failure.

use std::sync::Arc;

use bon::Builder;
use tracing::{error, info, warn};

use crate::error::RelayError;
use crate::models::{ModelSelector, RoutingDecision, Scenario};
use crate::provider::{ChatBackend, ProviderRequest, DEFAULT_MAX_TOKENS};
use crate::types::{ChatMessage, ChatResult, TextStream};

/// Inputs to a smart call.
#[derive(Debug, Clone, Builder)]
pub struct SmartRequest {
    /// `None` routes by the default rule.
    pub scenario: Option<Scenario>,
    #[builder(into)]
    pub system_prompt: String,
    #[builder(default)]
    pub messages: Vec<ChatMessage>,
    #[builder(default)]
    pub has_image: bool,
    #[builder(default)]
    pub is_long_text: bool,
    #[builder(default = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,
}

impl SmartRequest {
    /// The primary target for this request.
    pub fn route(&self) -> RoutingDecision {
        ModelSelector::select(self.scenario, self.has_image, self.is_long_text)
    }

    fn provider_request(&self) -> ProviderRequest {
        ProviderRequest::new(self.system_prompt.clone(), self.messages.clone())
            .with_max_tokens(self.max_tokens)
    }
}

/// Client-side orchestrator over a [`ChatBackend`].
#[derive(Clone)]
pub struct Orchestrator {
    backend: Arc<dyn ChatBackend>,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// Non-streaming smart call.
    ///
    /// Tries the routed model, then exactly one fallback model. Never fails:
    /// errors come back as `ChatResult { success: false, .. }`.
    pub async fn smart_chat(&self, request: &SmartRequest) -> ChatResult {
        let primary = request.route();
        info!(scenario = ?request.scenario, model = %primary, "routing smart chat");

        let provider_request = request.provider_request();
        let err = match self
            .backend
            .invoke(primary.provider, primary.model, &provider_request)
            .await
        {
            Ok(completion) => return completion.into(),
            Err(err) => err,
        };

        let fallback = ModelSelector::fallback(primary.provider, primary.model);
        warn!(error = %err, primary = %primary, fallback = %fallback, "primary model failed, falling back");

        match self
            .backend
            .invoke(fallback.provider, fallback.model, &provider_request)
            .await
        {
            Ok(completion) => completion.into(),
            Err(err) => {
                error!(error = %err, model = %fallback, "fallback model failed");
                ChatResult::failed(err.to_string())
            }
        }
    }

    /// Streaming smart call. Routes once and does not fall back: a failure
    /// to open the stream is returned to the caller.
    pub async fn smart_stream_chat(&self, request: &SmartRequest) -> Result<TextStream, RelayError> {
        let primary = request.route();
        info!(scenario = ?request.scenario, model = %primary, "routing smart stream");
        self.backend
            .invoke_streaming(primary.provider, primary.model, &request.provider_request())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProviderKey;

    #[test]
    fn builder_defaults() {
        let request = SmartRequest::builder().system_prompt("sys").build();
        assert_eq!(request.scenario, None);
        assert!(request.messages.is_empty());
        assert_eq!(request.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(
            request.route(),
            RoutingDecision::new(ProviderKey::DeepSeek, "deepseek-chat")
        );
    }

    #[test]
    fn provider_request_carries_budget() {
        let request = SmartRequest::builder()
            .scenario(Scenario::Chat)
            .system_prompt("sys")
            .messages(vec![ChatMessage::user("hi")])
            .max_tokens(512)
            .build();
        let provider_request = request.provider_request();
        assert_eq!(provider_request.max_tokens, 512);
        assert_eq!(provider_request.system_prompt, "sys");
        assert_eq!(provider_request.messages.len(), 1);
    }
}
