//! Error-to-HTTP shaping for the relay.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::RelayError;

/// JSON error body: `{error, message?, details?}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            details: None,
        }
    }

    fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl From<&RelayError> for ErrorBody {
    fn from(err: &RelayError) -> Self {
        match err {
            RelayError::MethodNotAllowed(_) => ErrorBody::new("Method not allowed"),
            RelayError::MissingCredential { .. } => ErrorBody::new(err.to_string()),
            RelayError::InvalidProvider(id) => ErrorBody::new("Invalid provider").with_message(id),
            RelayError::UnsupportedModel { .. } => {
                ErrorBody::new("Unsupported model").with_message(err.to_string())
            }
            RelayError::InvalidRequest(reason) => {
                ErrorBody::new("Invalid request").with_message(reason)
            }
            RelayError::UpstreamError { status, body } => ErrorBody {
                error: format!("AI API error: {status}"),
                message: None,
                details: Some(body.clone()),
            },
            other => ErrorBody::new("Internal server error").with_message(other.to_string()),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::BAD_GATEWAY);
        (status, Json(ErrorBody::from(&self))).into_response()
    }
}
