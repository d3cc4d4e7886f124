//! Conversation message domain types.
//!
//! These are the value objects handed to the generation collaborator after
//! the raw request history has been normalized:
//! Raw history → HistoryNormalizer → bounded `ConversationMessage`s → generation step.

use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
///
/// Only two roles survive normalization. Anything that is not exactly
/// `"assistant"` is treated as the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    #[default]
    User,
    /// The AI assistant
    Assistant,
}

impl Role {
    /// Coerce a raw role label. Case-sensitive: `"Assistant"` is a user turn.
    pub fn from_raw(raw: &str) -> Self {
        if raw == "assistant" {
            Self::Assistant
        } else {
            Self::User
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single normalized conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// Who sent this message
    pub role: Role,

    /// The trimmed, non-empty text content
    pub content: String,
}

impl ConversationMessage {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
