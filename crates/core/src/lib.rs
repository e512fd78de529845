//! # MoodMate Core
//!
//! Domain types, traits, and error definitions for the MoodMate chat service.
//! This crate has **zero framework dependencies** — it defines the domain model
//! that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (completion service, emotion classifier,
//! session store) is defined as a trait here. Implementations live in their
//! respective crates. This enables:
//! - Swapping providers via configuration
//! - Easy testing with stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod affect;
pub mod classifier;
pub mod completion;
pub mod error;
pub mod session;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use affect::AffectLabel;
pub use classifier::EmotionClassifier;
pub use completion::{CompletionClient, CompletionRequest, PromptMessage, PromptRole};
pub use error::{CompletionError, Error, Result, SessionStoreError, TurnError};
pub use session::SessionStore;
pub use turn::{ConversationTurn, Role, TurnResult};
