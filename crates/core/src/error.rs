//! Error types for the MoodMate domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; `TurnError` is the
//! orchestrator-level taxonomy the gateway maps onto HTTP statuses.

use thiserror::Error;

use crate::affect::AffectLabel;

/// The top-level error type for MoodMate operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    #[error("Session store error: {0}")]
    Session(#[from] SessionStoreError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// A failed generation call. No retry is attempted for these.
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// How a turn can fail.
///
/// Every variant carries enough context for the gateway to build a
/// well-formed JSON body — a turn failure never surfaces as a raw error.
#[derive(Debug, Error)]
pub enum TurnError {
    /// Missing required input; no external calls were made.
    #[error("Missing message or userId")]
    Validation,

    /// Generation failed; history was left untouched.
    #[error("Completion backend unavailable")]
    Generation {
        user_mood: AffectLabel,
        #[source]
        source: CompletionError,
    },

    /// A reply was generated but could not be durably recorded.
    #[error("Failed to persist conversation history")]
    Persistence {
        user_mood: AffectLabel,
        bot_mood: AffectLabel,
        #[source]
        source: SessionStoreError,
    },
}
