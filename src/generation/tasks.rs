//! Preset smart calls for the assistant's product analyses.

use strum::{Display, EnumString};

use super::smart::SmartRequest;
use crate::models::Scenario;
use crate::types::ChatMessage;

/// Documents longer than this many characters route as long text.
pub const LONG_TEXT_THRESHOLD: usize = 10_000;

pub fn is_long_text(text: &str) -> bool {
    text.chars().count() > LONG_TEXT_THRESHOLD
}

/// A named analysis the assistant runs, with its scenario and token budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum AnalysisTask {
    NavigatorChat,
    Positioning,
    Market,
    Users,
    Sales,
    GtmRoadmap,
    CanvasDimension,
    Competitor,
    DocumentSummary,
}

impl AnalysisTask {
    pub fn scenario(self) -> Scenario {
        match self {
            Self::NavigatorChat => Scenario::Chat,
            Self::Positioning
            | Self::Market
            | Self::Users
            | Self::Sales
            | Self::GtmRoadmap
            | Self::CanvasDimension => Scenario::Analysis,
            Self::Competitor => Scenario::Competitor,
            Self::DocumentSummary => Scenario::DocumentParse,
        }
    }

    pub fn max_tokens(self) -> u32 {
        match self {
            Self::Positioning | Self::Market | Self::Users | Self::Sales | Self::GtmRoadmap => 3000,
            Self::NavigatorChat | Self::CanvasDimension | Self::Competitor | Self::DocumentSummary => {
                2000
            }
        }
    }

    /// Single-prompt request for this task.
    pub fn request(
        self,
        system_prompt: impl Into<String>,
        prompt: impl Into<String>,
        has_image: bool,
    ) -> SmartRequest {
        SmartRequest::builder()
            .scenario(self.scenario())
            .system_prompt(system_prompt)
            .messages(vec![ChatMessage::user(prompt)])
            .has_image(has_image)
            .max_tokens(self.max_tokens())
            .build()
    }

    /// Document summary request; the long-text flag comes from the source
    /// document, not the (longer) rendered prompt.
    pub fn document_summary(
        system_prompt: impl Into<String>,
        prompt: impl Into<String>,
        document: &str,
    ) -> SmartRequest {
        let mut request = Self::DocumentSummary.request(system_prompt, prompt, false);
        request.is_long_text = is_long_text(document);
        request
    }

    /// Continue a navigator conversation.
    pub fn navigator_chat(
        system_prompt: impl Into<String>,
        messages: Vec<ChatMessage>,
        has_image: bool,
    ) -> SmartRequest {
        SmartRequest::builder()
            .scenario(Scenario::Chat)
            .system_prompt(system_prompt)
            .messages(messages)
            .has_image(has_image)
            .max_tokens(Self::NavigatorChat.max_tokens())
            .build()
    }
}
