//! EmotionClassifier trait — the abstraction over sentiment backends.
//!
//! The classifier serves two roles: detecting the mood of the user's
//! message, and inferring the assistant's mood when the model forgot its
//! trailing tag. Neither use is allowed to fail a turn, so the trait is
//! infallible by contract: implementations absorb every upstream failure
//! and resolve to [`AffectLabel::Neutral`].

use async_trait::async_trait;

use crate::affect::AffectLabel;

/// The core EmotionClassifier trait.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// A human-readable name for this backend (e.g., "huggingface").
    fn name(&self) -> &str;

    /// Classify the dominant emotion of `text`.
    ///
    /// Must never raise past its own boundary — always resolves to some
    /// label, falling back to `Neutral` on failure.
    async fn classify(&self, text: &str) -> AffectLabel;
}
