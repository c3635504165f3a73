//! Error classification and recovery.

use serde::{Deserialize, Serialize};

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    InvalidRequest,
    Configuration,
    Authentication,
    RateLimit,
    Server,
    Upstream,
    Network,
    Serialization,
    Method,
    Internal,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    RetryWithBackoff,
    SwitchProvider,
    CheckCredentials,
    CheckConfiguration,
    FixRequest,
}

impl RecoverySuggestion {
    /// One-line operator hint.
    pub fn hint(self) -> &'static str {
        match self {
            Self::RetryWithBackoff => "retry after a short wait",
            Self::SwitchProvider => "try another provider or model",
            Self::CheckCredentials => "check the provider API key",
            Self::CheckConfiguration => "set the provider API key in the environment or config file",
            Self::FixRequest => "check the request provider, model, and body",
        }
    }
}
