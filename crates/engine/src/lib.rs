//! The conversational turn pipeline for MoodMate.
//!
//! Everything between "a message arrived" and "a labeled reply goes back":
//! - [`context`] — bound history to a word-count budget
//! - [`prompt`] — compose the instruction + history payload
//! - [`tagger`] — extract or infer the affect label from the raw reply
//! - [`orchestrator`] — tie it together with per-session serialization

pub mod context;
pub mod orchestrator;
pub mod prompt;
pub mod tagger;

pub use context::{trim_history, DEFAULT_CONTEXT_BUDGET};
pub use orchestrator::{TurnOrchestrator, FALLBACK_REPLY};
pub use prompt::{compose, system_instructions};
pub use tagger::{extract, resolve};
