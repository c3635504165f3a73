//! Typed provider identifiers, endpoints, and header shapes.

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::provider::http::bearer_headers;

/// The upstream vendors the relay knows how to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
pub enum ProviderKey {
    #[serde(rename = "QWEN")]
    #[strum(serialize = "QWEN")]
    Qwen,
    #[serde(rename = "DEEPSEEK")]
    #[strum(serialize = "DEEPSEEK")]
    DeepSeek,
    #[serde(rename = "GLM")]
    #[strum(serialize = "GLM")]
    Glm,
    #[serde(rename = "MOONSHOT")]
    #[strum(serialize = "MOONSHOT")]
    Moonshot,
}

impl ProviderKey {
    /// Every recognized provider, in catalog order.
    pub const ALL: [ProviderKey; 4] = [Self::Qwen, Self::DeepSeek, Self::Glm, Self::Moonshot];

    /// Canonical provider key string as it appears on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Qwen => "QWEN",
            Self::DeepSeek => "DEEPSEEK",
            Self::Glm => "GLM",
            Self::Moonshot => "MOONSHOT",
        }
    }

    /// Parse a provider id, case-insensitively, including vendor aliases.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "qwen" | "dashscope" => Some(Self::Qwen),
            "deepseek" => Some(Self::DeepSeek),
            "glm" | "zhipu" => Some(Self::Glm),
            "moonshot" | "kimi" => Some(Self::Moonshot),
            _ => None,
        }
    }

    /// Absolute chat-completions endpoint used when no base URL override is set.
    pub const fn default_endpoint(self) -> &'static str {
        match self {
            Self::Qwen => "https://dashscope.aliyuncs.com/compatible-mode/v1/chat/completions",
            Self::DeepSeek => "https://api.deepseek.com/chat/completions",
            Self::Glm => "https://open.bigmodel.cn/api/paas/v4/chat/completions",
            Self::Moonshot => "https://api.moonshot.cn/v1/chat/completions",
        }
    }

    /// Chat-completions endpoint, honoring an optional base URL override.
    pub fn endpoint(self, base_url: Option<&str>) -> String {
        match base_url {
            Some(base) => format!("{}/chat/completions", base.trim_end_matches('/')),
            None => self.default_endpoint().to_string(),
        }
    }

    /// Request headers for this vendor.
    ///
    /// All four vendors speak the OpenAI-compatible bearer scheme today; a
    /// vendor with a different auth header only needs a new arm here.
    pub fn headers(self, secret: &str) -> HeaderMap {
        match self {
            Self::Qwen | Self::DeepSeek | Self::Glm | Self::Moonshot => bearer_headers(secret),
        }
    }

    /// Environment variables holding this provider's secret, in lookup order.
    pub const fn api_key_env_vars(self) -> &'static [&'static str] {
        match self {
            Self::Qwen => &["QWEN_API_KEY", "VITE_QWEN_API_KEY"],
            Self::DeepSeek => &["DEEPSEEK_API_KEY", "VITE_DEEPSEEK_API_KEY"],
            Self::Glm => &["GLM_API_KEY", "VITE_GLM_API_KEY"],
            Self::Moonshot => &["MOONSHOT_API_KEY", "VITE_MOONSHOT_API_KEY"],
        }
    }

    /// Environment variable overriding this provider's base URL.
    pub const fn base_url_env_var(self) -> &'static str {
        match self {
            Self::Qwen => "QWEN_BASE_URL",
            Self::DeepSeek => "DEEPSEEK_BASE_URL",
            Self::Glm => "GLM_BASE_URL",
            Self::Moonshot => "MOONSHOT_BASE_URL",
        }
    }
}

impl std::str::FromStr for ProviderKey {
    type Err = crate::error::RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| crate::error::RelayError::InvalidProvider(s.to_string()))
    }
}
