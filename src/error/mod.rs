//! Error types for the relay.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

/// Primary error type for all relay operations.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Invalid provider: {0}")]
    InvalidProvider(String),

    #[error("API key for {provider} not configured")]
    MissingCredential { provider: String },

    #[error("Unsupported model: {provider}/{model}")]
    UnsupportedModel { provider: String, model: String },

    #[error("AI API error: {status}")]
    UpstreamError { status: u16, body: String },

    #[error("Malformed stream chunk: {0}")]
    MalformedStreamChunk(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Internal fault: {0}")]
    InternalFault(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RelayError {
    /// Create an upstream error carrying the vendor's raw body.
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::UpstreamError {
            status,
            body: body.into(),
        }
    }

    /// Create a missing-credential error for a provider.
    pub fn missing_credential(provider: impl Into<String>) -> Self {
        Self::MissingCredential {
            provider: provider.into(),
        }
    }

    /// Create an unsupported-model error.
    pub fn unsupported_model(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self::UnsupportedModel {
            provider: provider.into(),
            model: model.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidProvider(_) | Self::UnsupportedModel { .. } | Self::InvalidRequest(_) => {
                ErrorCategory::InvalidRequest
            }
            Self::MissingCredential { .. } | Self::Configuration(_) => {
                ErrorCategory::Configuration
            }
            Self::UpstreamError { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                429 => ErrorCategory::RateLimit,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Upstream,
            },
            Self::MalformedStreamChunk(_) | Self::Serialization(_) => ErrorCategory::Serialization,
            Self::MethodNotAllowed(_) => ErrorCategory::Method,
            Self::Network(_) | Self::Io(_) => ErrorCategory::Network,
            Self::InternalFault(_) => ErrorCategory::Internal,
        }
    }

    /// HTTP status the relay answers with for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidProvider(_)
            | Self::MissingCredential { .. }
            | Self::UnsupportedModel { .. }
            | Self::InvalidRequest(_) => 400,
            Self::MethodNotAllowed(_) => 405,
            Self::UpstreamError { status, .. } => *status,
            _ => 500,
        }
    }

    /// Whether a retry against the same target could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit | ErrorCategory::Network | ErrorCategory::Server
        )
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Authentication => RecoverySuggestion::CheckCredentials,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::RateLimit | ErrorCategory::Network | ErrorCategory::Server => {
                RecoverySuggestion::RetryWithBackoff
            }
            ErrorCategory::InvalidRequest | ErrorCategory::Method => {
                RecoverySuggestion::FixRequest
            }
            _ => RecoverySuggestion::SwitchProvider,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, RelayError>;
