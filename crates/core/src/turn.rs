//! Conversation turn domain types.
//!
//! A turn is one side of an exchange: either the user's message or the
//! assistant's (cleaned) reply. A session's history is an ordered,
//! append-only sequence of turns; insertion order is chronological order.

use serde::{Deserialize, Serialize};

use crate::affect::AffectLabel;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
}

/// A single turn in a conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who sent this turn
    pub role: Role,

    /// The text content
    pub content: String,
}

impl ConversationTurn {
    /// Create a new user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Approximate token cost: whitespace-delimited word count.
    ///
    /// A deliberate cheap approximation — sufficient for a hard context
    /// limit, without pulling in a real tokenizer.
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

/// The outcome of one successful (or gracefully degraded) turn.
///
/// Returned to the caller; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResult {
    /// The assistant's reply with any trailing affect tag stripped
    pub reply: String,

    /// Detected mood of the user's message
    pub user_mood: AffectLabel,

    /// Mood the assistant's reply carries
    pub bot_mood: AffectLabel,
}
