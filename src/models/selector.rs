//! Scenario-based model routing.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::provider_key::ProviderKey;

/// Calling context used to pick a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Scenario {
    /// Guided GTM conversation.
    Chat,
    /// PDF / slide / document parsing.
    #[serde(rename = "document", alias = "document_parse")]
    #[strum(to_string = "document", serialize = "document_parse")]
    DocumentParse,
    /// Deep multi-dimension analysis.
    Analysis,
    /// Long document summarization.
    LongText,
    /// Competitor analysis.
    Competitor,
}

impl Scenario {
    /// Parse a scenario name; unknown names yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

/// The (provider, model) pair chosen for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RoutingDecision {
    pub provider: ProviderKey,
    pub model: &'static str,
}

impl RoutingDecision {
    pub const fn new(provider: ProviderKey, model: &'static str) -> Self {
        Self { provider, model }
    }
}

impl std::fmt::Display for RoutingDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}

const VISION_LOW_COST: RoutingDecision = RoutingDecision::new(ProviderKey::Qwen, "qwen-vl-plus");
const FAST_TEXT: RoutingDecision = RoutingDecision::new(ProviderKey::Qwen, "qwen-turbo");
const TOP_MULTIMODAL: RoutingDecision = RoutingDecision::new(ProviderKey::Qwen, "qwen-vl-max");
const VISION_BALANCED: RoutingDecision = RoutingDecision::new(ProviderKey::Glm, "glm-4v");
const REASONING_TEXT: RoutingDecision = RoutingDecision::new(ProviderKey::DeepSeek, "deepseek-chat");
const LONG_CONTEXT: RoutingDecision = RoutingDecision::new(ProviderKey::Moonshot, "moonshot-v1-128k");

/// Pure routing rules: scenario hints in, (provider, model) out.
pub struct ModelSelector;

impl ModelSelector {
    /// Pick the primary model. First matching rule wins.
    pub fn select(scenario: Option<Scenario>, has_image: bool, is_long_text: bool) -> RoutingDecision {
        match scenario {
            Some(Scenario::Chat) if has_image => VISION_LOW_COST,
            Some(Scenario::Chat) => FAST_TEXT,
            Some(Scenario::DocumentParse) => TOP_MULTIMODAL,
            Some(Scenario::Analysis) if has_image => VISION_BALANCED,
            Some(Scenario::Analysis) => REASONING_TEXT,
            s if s == Some(Scenario::LongText) || is_long_text => {
                if has_image {
                    TOP_MULTIMODAL
                } else {
                    LONG_CONTEXT
                }
            }
            Some(Scenario::Competitor) if has_image => VISION_BALANCED,
            Some(Scenario::Competitor) => REASONING_TEXT,
            _ => REASONING_TEXT,
        }
    }

    /// Route by scenario name. Unknown names take the default rule.
    pub fn select_named(scenario: &str, has_image: bool, is_long_text: bool) -> RoutingDecision {
        Self::select(Scenario::parse(scenario), has_image, is_long_text)
    }

    /// The single fallback hop for a failed (provider, model).
    ///
    /// Vision detection is a substring heuristic: any 'v' in the model id
    /// (which covers "vl") counts as multimodal. Text models whose id happens
    /// to contain a 'v', such as `moonshot-v1-128k`, are treated as
    /// vision-capable too.
    pub fn fallback(_provider: ProviderKey, model: &str) -> RoutingDecision {
        if model.contains('v') {
            VISION_LOW_COST
        } else {
            REASONING_TEXT
        }
    }
}
