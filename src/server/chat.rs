//! `/api/chat` relay handler.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONNECTION, CONTENT_TYPE};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use futures::{FutureExt, Stream, StreamExt};
use serde::Deserialize;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};
use uuid::Uuid;

use super::AppState;
use crate::error::RelayError;
use crate::models::ProviderKey;
use crate::provider::{ChatCompletionsRequest, DEFAULT_TEMPERATURE};
use crate::types::ChatMessage;

/// Token budget when the relay request omits `maxTokens`.
pub const RELAY_DEFAULT_MAX_TOKENS: u32 = 4000;

/// Relay request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    pub provider: String,
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl RelayRequest {
    fn into_upstream(self) -> ChatCompletionsRequest {
        ChatCompletionsRequest {
            model: self.model,
            messages: self.messages,
            max_tokens: self.max_tokens.unwrap_or(RELAY_DEFAULT_MAX_TOKENS),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            stream: true,
        }
    }
}

/// Accepts any method so non-POST requests get the relay's own 405 body.
/// Faults, panics included, are contained to the request that raised them.
pub async fn relay_chat(State(state): State<AppState>, method: Method, body: Bytes) -> Response {
    let span = info_span!("relay", request_id = %Uuid::new_v4());
    let outcome = AssertUnwindSafe(relay(state, method, body))
        .catch_unwind()
        .instrument(span.clone())
        .await;

    match outcome {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => {
            if err.http_status() >= 500 {
                error!(parent: &span, error = %err, "relay failed");
            } else {
                warn!(parent: &span, error = %err, "relay rejected request");
            }
            err.into_response()
        }
        Err(panic) => {
            let fault = RelayError::InternalFault(panic_message(panic.as_ref()));
            error!(parent: &span, error = %fault, "relay handler panicked");
            fault.into_response()
        }
    }
}

async fn relay(state: AppState, method: Method, body: Bytes) -> Result<Response, RelayError> {
    if method != Method::POST {
        return Err(RelayError::MethodNotAllowed(method.to_string()));
    }

    let request: RelayRequest = serde_json::from_slice(&body)
        .map_err(|e| RelayError::InvalidRequest(e.to_string()))?;
    let provider: ProviderKey = request.provider.parse()?;

    let upstream = request.into_upstream();
    info!(provider = provider.as_str(), model = %upstream.model, "relaying chat");

    let resp = state.gateway.send(provider, &upstream).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/event-stream")
        .header(CACHE_CONTROL, "no-cache")
        .header(CONNECTION, "keep-alive")
        .body(Body::from_stream(forward(resp.bytes_stream(), Span::current())))
        .map_err(|e| RelayError::InternalFault(e.to_string()))
}

/// Pass upstream chunks through untouched. Dropping the returned stream
/// (client gone) drops the upstream response with it.
fn forward<S>(upstream: S, span: Span) -> impl Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
{
    async_stream::stream! {
        let mut relayed = 0usize;
        futures::pin_mut!(upstream);
        while let Some(chunk) = upstream.next().await {
            match chunk {
                Ok(bytes) => {
                    relayed += bytes.len();
                    yield Ok(bytes);
                }
                Err(e) => {
                    warn!(parent: &span, error = %e, relayed, "upstream stream broke mid-relay");
                    yield Err(e);
                    break;
                }
            }
        }
        debug!(parent: &span, relayed, "relay stream finished");
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

/// `GET /api/health`.
pub async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({ "status": "ok" }))
}
