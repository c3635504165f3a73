//! Shared test helpers and mock backend.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use gtm_relay::config::RelayConfig;
use gtm_relay::error::RelayError;
use gtm_relay::models::ProviderKey;
use gtm_relay::provider::{ChatBackend, ProviderRequest};
use gtm_relay::types::{ChatCompletion, StreamState, TextStream};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub provider: ProviderKey,
    pub model: String,
    pub streaming: bool,
    pub max_tokens: u32,
}

/// A backend that replays queued outcomes and records every call.
#[derive(Default)]
pub struct MockBackend {
    outcomes: Mutex<VecDeque<Result<String, RelayError>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a successful reply.
    pub fn queue_ok(&self, text: &str) {
        self.outcomes.lock().unwrap().push_back(Ok(text.to_string()));
    }

    /// Queue a failure.
    pub fn queue_err(&self, err: RelayError) {
        self.outcomes.lock().unwrap().push_back(Err(err));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn next(
        &self,
        provider: ProviderKey,
        model: &str,
        request: &ProviderRequest,
        streaming: bool,
    ) -> Result<String, RelayError> {
        self.calls.lock().unwrap().push(Call {
            provider,
            model: model.to_string(),
            streaming,
            max_tokens: request.max_tokens,
        });
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("Mock response".to_string()))
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn invoke(
        &self,
        provider: ProviderKey,
        model: &str,
        request: &ProviderRequest,
    ) -> Result<ChatCompletion, RelayError> {
        let content = self.next(provider, model, request, false)?;
        Ok(ChatCompletion {
            content,
            model: format!("{provider}/{model}"),
            usage: None,
        })
    }

    async fn invoke_streaming(
        &self,
        provider: ProviderKey,
        model: &str,
        request: &ProviderRequest,
    ) -> Result<TextStream, RelayError> {
        let text = self.next(provider, model, request, true)?;
        let stream = async_stream::stream! {
            let mut state = StreamState::new();
            for chunk in text.chars().collect::<Vec<_>>().chunks(2) {
                let fragment: String = chunk.iter().collect();
                if let Some(delta) = state.push(&fragment) {
                    yield Ok(delta);
                }
            }
        };
        Ok(Box::pin(stream))
    }
}

/// Config with a key for every provider, all pointed at one mock base URL.
pub fn config_for(base_url: &str) -> Arc<RelayConfig> {
    let mut config = RelayConfig::new();
    for key in ProviderKey::ALL {
        config = config
            .with_api_key(key, format!("sk-test-{}", key.as_str().to_lowercase()))
            .with_base_url(key, base_url);
    }
    Arc::new(config)
}

/// Build an SSE body from delta fragments, ending with `[DONE]`.
pub fn sse_body(fragments: &[&str]) -> String {
    let mut body = String::new();
    for fragment in fragments {
        let chunk = serde_json::json!({"choices": [{"delta": {"content": fragment}}]});
        body.push_str(&format!("data: {chunk}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    body
}
