//! Call results.

use serde::{Deserialize, Serialize};

/// A successful chat completion from one upstream call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletion {
    pub content: String,
    /// `"<provider display name>/<model display name>"`.
    pub model: String,
    /// Vendor usage block, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<serde_json::Value>,
}

/// Tagged outcome handed to callers of the smart-call wrapper.
///
/// Serializes as `{success: true, content, model, usage}` or
/// `{success: false, error}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: None,
            model: None,
            usage: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

impl From<ChatCompletion> for ChatResult {
    fn from(completion: ChatCompletion) -> Self {
        Self {
            success: true,
            content: Some(completion.content),
            model: Some(completion.model),
            usage: completion.usage,
            error: None,
        }
    }
}
