//! Emotion-classification client for Hugging Face style inference endpoints.
//!
//! The endpoint returns a distribution of `{label, score}` pairs for the
//! input text, sometimes wrapped in an extra nesting level. The client
//! flattens the distribution, takes the max-score label (first occurrence
//! wins ties), and normalizes it into the closed [`AffectLabel`] set.
//!
//! Failure policy: hosted inference models are routinely cold ("model is
//! currently loading"), so the client retries on a bounded fixed-delay
//! policy and, when retries are exhausted, resolves to `Neutral`. Nothing
//! in a turn is allowed to fail because mood detection did.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use moodmate_core::affect::AffectLabel;
use moodmate_core::classifier::EmotionClassifier;

/// Bounded fixed-delay retry policy.
///
/// `attempts` counts retries after the first try; the delay is injectable
/// so tests can run with `Duration::ZERO`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: std::time::Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 1,
            delay: std::time::Duration::from_millis(500),
        }
    }
}

/// A Hugging Face inference-API text classifier.
pub struct HuggingFaceClassifier {
    name: String,
    api_url: String,
    api_key: String,
    retry: RetryPolicy,
    client: reqwest::Client,
}

#[derive(Debug, Error)]
enum AttemptError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API request failed (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("classifier reported error: {0}")]
    Reported(String),

    #[error("unusable response: {0}")]
    Unusable(String),
}

impl HuggingFaceClassifier {
    /// Create a new classifier against the full model inference URL.
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: "huggingface".into(),
            api_url: api_url.into(),
            api_key: api_key.into(),
            retry: RetryPolicy::default(),
            client,
        }
    }

    /// Override the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn attempt(&self, text: &str) -> Result<AffectLabel, AttemptError> {
        let body = serde_json::json!({ "inputs": text });

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| AttemptError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let payload: serde_json::Value = match response.json().await {
            Ok(v) => v,
            Err(e) if status != 200 => {
                return Err(AttemptError::Api {
                    status,
                    body: e.to_string(),
                });
            }
            Err(e) => return Err(AttemptError::Unusable(e.to_string())),
        };

        // A cold model answers 503 with {"error": "... currently loading ..."};
        // other failures may carry an error field with a 200.
        if let Some(err) = payload.get("error") {
            return Err(AttemptError::Reported(err.to_string()));
        }

        if status != 200 {
            return Err(AttemptError::Api {
                status,
                body: payload.to_string(),
            });
        }

        select_top_label(&payload)
            .ok_or_else(|| AttemptError::Unusable(format!("no label/score pairs in {payload}")))
    }
}

#[async_trait]
impl EmotionClassifier for HuggingFaceClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn classify(&self, text: &str) -> AffectLabel {
        for attempt in 0..=self.retry.attempts {
            match self.attempt(text).await {
                Ok(label) => {
                    debug!(backend = %self.name, %label, "Emotion detected");
                    return label;
                }
                Err(e) => {
                    warn!(backend = %self.name, attempt, error = %e, "Emotion detection failed");
                    if attempt < self.retry.attempts {
                        tokio::time::sleep(self.retry.delay).await;
                    }
                }
            }
        }
        AffectLabel::Neutral
    }
}

/// Pick the max-score label from a (possibly double-nested) distribution.
///
/// Ties break to the first occurrence in the returned list — arbitrary but
/// deterministic.
fn select_top_label(payload: &serde_json::Value) -> Option<AffectLabel> {
    let mut predictions = payload.as_array()?.as_slice();

    // Some deployments wrap the distribution in an extra array level.
    if let Some(inner) = predictions.first().and_then(|v| v.as_array()) {
        predictions = inner.as_slice();
    }

    let mut best: Option<(&str, f64)> = None;
    for prediction in predictions {
        let label = prediction.get("label")?.as_str()?;
        let score = prediction.get("score")?.as_f64()?;
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((label, score));
        }
    }

    best.map(|(label, _)| AffectLabel::from_raw(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_max_score_from_flat_distribution() {
        let payload = serde_json::json!([
            {"label": "sadness", "score": 0.12},
            {"label": "joy", "score": 0.81},
            {"label": "neutral", "score": 0.07}
        ]);
        assert_eq!(select_top_label(&payload), Some(AffectLabel::Joy));
    }

    #[test]
    fn unwraps_double_nested_distribution() {
        let payload = serde_json::json!([[
            {"label": "anger", "score": 0.66},
            {"label": "fear", "score": 0.34}
        ]]);
        assert_eq!(select_top_label(&payload), Some(AffectLabel::Anger));
    }

    #[test]
    fn ties_break_to_first_occurrence() {
        let payload = serde_json::json!([
            {"label": "fear", "score": 0.5},
            {"label": "surprise", "score": 0.5}
        ]);
        assert_eq!(select_top_label(&payload), Some(AffectLabel::Fear));
    }

    #[test]
    fn unknown_raw_labels_normalize_to_neutral() {
        let payload = serde_json::json!([{"label": "LABEL_3", "score": 0.9}]);
        assert_eq!(select_top_label(&payload), Some(AffectLabel::Neutral));
    }

    #[test]
    fn alias_labels_normalize_into_closed_set() {
        let payload = serde_json::json!([{"label": "love", "score": 0.97}]);
        assert_eq!(select_top_label(&payload), Some(AffectLabel::Joy));
    }

    #[test]
    fn non_distribution_payloads_are_rejected() {
        assert_eq!(select_top_label(&serde_json::json!({"error": "loading"})), None);
        assert_eq!(select_top_label(&serde_json::json!([])), None);
        assert_eq!(select_top_label(&serde_json::json!([{"label": "joy"}])), None);
    }

    /// Serve one canned HTTP response per connection, in order.
    async fn scripted_endpoint(responses: Vec<(u16, &'static str)>) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();

                // Drain the request headers before answering.
                let mut buf = vec![0u8; 8192];
                let mut read = 0;
                loop {
                    let n = socket.read(&mut buf[read..]).await.unwrap();
                    read += n;
                    if n == 0 || buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }

                let reason = if status == 200 { "OK" } else { "Service Unavailable" };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
        });

        format!("http://{addr}/classify")
    }

    #[tokio::test]
    async fn cold_model_recovers_on_retry() {
        // First attempt hits a cold model, the retry gets a real
        // distribution back.
        let url = scripted_endpoint(vec![
            (503, r#"{"error":"Model is currently loading","estimated_time":20.0}"#),
            (200, r#"[[{"label":"joy","score":0.93},{"label":"neutral","score":0.07}]]"#),
        ])
        .await;

        let classifier =
            HuggingFaceClassifier::new(url, "key", std::time::Duration::from_secs(2)).with_retry(
                RetryPolicy {
                    attempts: 1,
                    delay: std::time::Duration::ZERO,
                },
            );

        assert_eq!(classifier.classify("I got the job!").await, AffectLabel::Joy);
    }

    #[tokio::test]
    async fn reported_error_without_retries_left_resolves_to_neutral() {
        let url = scripted_endpoint(vec![(
            503,
            r#"{"error":"Model is currently loading","estimated_time":20.0}"#,
        )])
        .await;

        let classifier =
            HuggingFaceClassifier::new(url, "key", std::time::Duration::from_secs(2)).with_retry(
                RetryPolicy {
                    attempts: 0,
                    delay: std::time::Duration::ZERO,
                },
            );

        assert_eq!(classifier.classify("hello").await, AffectLabel::Neutral);
    }

    #[tokio::test]
    async fn unreachable_endpoint_resolves_to_neutral() {
        // Closed port: every attempt fails fast, zero-delay retry.
        let classifier = HuggingFaceClassifier::new(
            "http://127.0.0.1:9/classify",
            "key",
            std::time::Duration::from_millis(200),
        )
        .with_retry(RetryPolicy {
            attempts: 1,
            delay: std::time::Duration::ZERO,
        });

        assert_eq!(classifier.classify("hello").await, AffectLabel::Neutral);
    }
}
