//! Per-model capability metadata.

use serde::Serialize;

/// What a catalogued model can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelCapability {
    /// API model identifier sent upstream.
    pub id: &'static str,
    /// Human-readable model name.
    pub display_name: &'static str,
    pub supports_vision: bool,
    pub max_tokens: u32,
    pub description: &'static str,
}

impl ModelCapability {
    pub const fn text(
        id: &'static str,
        display_name: &'static str,
        max_tokens: u32,
        description: &'static str,
    ) -> Self {
        Self {
            id,
            display_name,
            supports_vision: false,
            max_tokens,
            description,
        }
    }

    pub const fn vision(
        id: &'static str,
        display_name: &'static str,
        max_tokens: u32,
        description: &'static str,
    ) -> Self {
        Self {
            id,
            display_name,
            supports_vision: true,
            max_tokens,
            description,
        }
    }
}
