//! Outbound calls to OpenAI-compatible chat-completion endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::models::{ModelCapability, ProviderKey, ProviderRegistry};
use crate::types::{with_system_prompt, ChatCompletion, TextStream};

use super::http::{shared_client, status_to_error};
use super::sse::delta_stream;
use super::{
    ChatBackend, ChatCompletionsRequest, ProviderRequest, DEFAULT_TEMPERATURE, STREAM_MAX_TOKENS,
};

/// Calls vendors directly with credentials from the injected config.
#[derive(Clone)]
pub struct UpstreamGateway {
    config: Arc<RelayConfig>,
    registry: &'static ProviderRegistry,
    client: reqwest::Client,
}

impl UpstreamGateway {
    pub fn new(config: Arc<RelayConfig>) -> Self {
        Self {
            config,
            registry: ProviderRegistry::builtin(),
            client: shared_client().clone(),
        }
    }

    fn validate(
        &self,
        provider: ProviderKey,
        model: &str,
    ) -> Result<&'static ModelCapability, RelayError> {
        self.registry
            .lookup(provider, model)
            .map_err(|_| RelayError::unsupported_model(provider.as_str(), model))
    }

    fn build_body(
        &self,
        model: &str,
        request: &ProviderRequest,
        max_tokens: u32,
        stream: bool,
    ) -> ChatCompletionsRequest {
        ChatCompletionsRequest {
            model: model.to_string(),
            messages: with_system_prompt(&request.system_prompt, &request.messages),
            max_tokens,
            temperature: DEFAULT_TEMPERATURE,
            stream,
        }
    }

    /// POST a prepared body to a provider and return the response once its
    /// status is known to be successful.
    ///
    /// Fails with `MissingCredential` before any network I/O, and with
    /// `UpstreamError` (body captured verbatim) on a non-success status.
    pub async fn send(
        &self,
        provider: ProviderKey,
        body: &ChatCompletionsRequest,
    ) -> Result<reqwest::Response, RelayError> {
        let secret = self
            .config
            .api_key(provider)
            .ok_or_else(|| RelayError::missing_credential(provider.as_str()))?;
        let url = self.config.endpoint(provider);

        debug!(
            provider = provider.as_str(),
            model = %body.model,
            stream = body.stream,
            messages = body.messages.len(),
            "upstream chat completion"
        );

        let resp = self
            .client
            .post(&url)
            .headers(provider.headers(secret))
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status.as_u16(), &body_text));
        }
        Ok(resp)
    }
}

#[async_trait]
impl ChatBackend for UpstreamGateway {
    async fn invoke(
        &self,
        provider: ProviderKey,
        model: &str,
        request: &ProviderRequest,
    ) -> Result<ChatCompletion, RelayError> {
        let capability = self.validate(provider, model)?;
        let body = self.build_body(model, request, request.max_tokens, false);

        let resp = self.send(provider, &body).await?;
        let data: ChatCompletionsResponse = resp.json().await?;
        let content = data
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                RelayError::InternalFault(format!(
                    "{provider}/{model} returned a completion with no message content"
                ))
            })?;

        let provider_name = self
            .registry
            .provider(provider)
            .map(|p| p.display_name)
            .unwrap_or(provider.as_str());

        Ok(ChatCompletion {
            content,
            model: format!("{provider_name}/{}", capability.display_name),
            usage: data.usage,
        })
    }

    async fn invoke_streaming(
        &self,
        provider: ProviderKey,
        model: &str,
        request: &ProviderRequest,
    ) -> Result<TextStream, RelayError> {
        self.validate(provider, model)?;
        let body = self.build_body(model, request, STREAM_MAX_TOKENS, true);
        let resp = self.send(provider, &body).await?;
        Ok(delta_stream(resp.bytes_stream()))
    }
}

// Chat-completions response (internal)

#[derive(Deserialize)]
struct ChatCompletionsResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}
