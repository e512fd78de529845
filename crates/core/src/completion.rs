//! CompletionClient trait — the abstraction over chat-completion backends.
//!
//! A CompletionClient knows how to send a composed message sequence to an
//! LLM and return the raw reply text. Implementations: Together.ai and any
//! other OpenAI-compatible endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CompletionError;
use crate::turn::{ConversationTurn, Role};

/// The role of a message in a completion request.
///
/// Wider than [`Role`]: prompts carry a leading system instruction that
/// never appears in persisted history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

/// A single message in the sequence handed to the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Assistant,
            content: content.into(),
        }
    }
}

impl From<&ConversationTurn> for PromptMessage {
    fn from(turn: &ConversationTurn) -> Self {
        Self {
            role: match turn.role {
                Role::User => PromptRole::User,
                Role::Assistant => PromptRole::Assistant,
            },
            content: turn.content.clone(),
        }
    }
}

/// Configuration for a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model to use (e.g., "mistralai/Mixtral-8x7B-Instruct-v0.1")
    pub model: String,

    /// The composed message sequence
    pub messages: Vec<PromptMessage>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum-reply-length bound, in tokens
    pub max_reply_tokens: u32,
}

fn default_temperature() -> f32 {
    0.7
}

/// The core CompletionClient trait.
///
/// A failed generation has no safe automatic retry budget — implementations
/// surface a single [`CompletionError`] and perform no retry.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// A human-readable name for this backend (e.g., "together").
    fn name(&self) -> &str;

    /// Send the composed messages and return the raw reply text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}
