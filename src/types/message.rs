//! Message types for model communication.

use serde::{Deserialize, Serialize};

/// A message in a conversation. Order within a conversation is turn order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: text.into(),
        }
    }

    /// Copy of this message with the role coerced to user/assistant.
    pub fn normalized(&self) -> Self {
        Self {
            role: self.role.normalized(),
            content: self.content.clone(),
        }
    }
}

/// Conversation role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Anything that is not an assistant turn is sent upstream as a user turn.
    pub fn normalized(self) -> Self {
        match self {
            Self::Assistant => Self::Assistant,
            Self::System | Self::User => Self::User,
        }
    }
}

/// Build the upstream message list: the system prompt first, then the
/// caller's turns in order with roles normalized.
pub fn with_system_prompt(system_prompt: &str, messages: &[ChatMessage]) -> Vec<ChatMessage> {
    std::iter::once(ChatMessage::system(system_prompt))
        .chain(messages.iter().map(ChatMessage::normalized))
        .collect()
}
