//! Outbound HTTP adapters for MoodMate.
//!
//! Two external collaborators live behind traits defined in
//! `moodmate-core`:
//! - [`TogetherClient`] — OpenAI-compatible chat completions (Together.ai
//!   and friends). Fails loudly, never retries.
//! - [`HuggingFaceClassifier`] — text-classification inference. Retries
//!   once on transient failure, then silently resolves to `neutral`.

pub mod huggingface;
pub mod together;

pub use huggingface::{HuggingFaceClassifier, RetryPolicy};
pub use together::TogetherClient;

use moodmate_config::AppConfig;

/// Build the completion client from configuration.
pub fn completion_from_config(config: &AppConfig) -> TogetherClient {
    TogetherClient::new(
        &config.completion.api_url,
        config.completion.api_key.clone().unwrap_or_default(),
        std::time::Duration::from_secs(config.completion.timeout_secs),
    )
}

/// Build the emotion classifier from configuration.
pub fn classifier_from_config(config: &AppConfig) -> HuggingFaceClassifier {
    HuggingFaceClassifier::new(
        &config.classifier.api_url,
        config.classifier.api_key.clone().unwrap_or_default(),
        std::time::Duration::from_secs(config.classifier.timeout_secs),
    )
    .with_retry(RetryPolicy {
        attempts: config.classifier.retry_attempts,
        delay: std::time::Duration::from_millis(config.classifier.retry_delay_ms),
    })
}
