//! End-to-end integration tests for the MoodMate service.
//!
//! These exercise the full pipeline from an HTTP request to persisted
//! session history: gateway routing, context trimming, prompt
//! composition, affect-tag resolution, and the file-backed store.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use moodmate_core::affect::AffectLabel;
use moodmate_core::classifier::EmotionClassifier;
use moodmate_core::completion::{CompletionClient, CompletionRequest, PromptRole};
use moodmate_core::error::CompletionError;
use moodmate_core::session::SessionStore;
use moodmate_core::turn::Role;
use moodmate_engine::TurnOrchestrator;
use moodmate_gateway::{build_router, GatewayState};
use moodmate_session::FileSessionStore;

// ── Scripted doubles ─────────────────────────────────────────────────────

/// A completion client that returns scripted replies in sequence and
/// records every request it receives.
struct ScriptedCompletion {
    replies: std::sync::Mutex<Vec<String>>,
    requests: std::sync::Mutex<Vec<CompletionRequest>>,
    call_count: std::sync::Mutex<usize>,
}

impl ScriptedCompletion {
    fn new(replies: &[&str]) -> Self {
        Self {
            replies: std::sync::Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            requests: std::sync::Mutex::new(Vec::new()),
            call_count: std::sync::Mutex::new(0),
        }
    }

    fn calls(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    fn name(&self) -> &str {
        "e2e_scripted"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(request);
        let mut count = self.call_count.lock().unwrap();
        let replies = self.replies.lock().unwrap();
        if *count >= replies.len() {
            panic!(
                "ScriptedCompletion exhausted: call #{}, have {}",
                *count,
                replies.len()
            );
        }
        let reply = replies[*count].clone();
        *count += 1;
        Ok(reply)
    }
}

/// A classifier that always answers the same label and counts calls.
struct FixedClassifier {
    label: AffectLabel,
    call_count: std::sync::Mutex<usize>,
}

impl FixedClassifier {
    fn new(label: AffectLabel) -> Self {
        Self {
            label,
            call_count: std::sync::Mutex::new(0),
        }
    }

    fn calls(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl EmotionClassifier for FixedClassifier {
    fn name(&self) -> &str {
        "e2e_fixed"
    }

    async fn classify(&self, _text: &str) -> AffectLabel {
        *self.call_count.lock().unwrap() += 1;
        self.label
    }
}

fn build_app(
    completion: Arc<ScriptedCompletion>,
    classifier: Arc<FixedClassifier>,
    store: Arc<FileSessionStore>,
) -> axum::Router {
    let orchestrator = TurnOrchestrator::new(completion, classifier, store)
        .with_model("e2e-model")
        .with_default_region("global");
    build_router(Arc::new(GatewayState { orchestrator }))
}

async fn post_chat(app: axum::Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ── E2E: multi-turn conversation over HTTP ───────────────────────────────

#[tokio::test]
async fn e2e_two_turns_accumulate_context_and_history() {
    let dir = tempfile::tempdir().unwrap();
    let completion = Arc::new(ScriptedCompletion::new(&[
        "Congratulations on the new job! [joy]",
        "Day one nerves are normal, you'll do great. [concern]",
    ]));
    let classifier = Arc::new(FixedClassifier::new(AffectLabel::Joy));
    let store = Arc::new(FileSessionStore::new(dir.path()));

    let app = build_app(completion.clone(), classifier.clone(), store.clone());

    let (status, json) = post_chat(
        app.clone(),
        serde_json::json!({"message": "I just got hired!", "userId": "sam"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reply"], "Congratulations on the new job!");
    assert_eq!(json["userMood"], "joy");
    assert_eq!(json["botMood"], "joy");

    let (status, json) = post_chat(
        app,
        serde_json::json!({"message": "A bit nervous about starting", "userId": "sam"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["botMood"], "concern");

    // The second upstream request must carry the whole exchange so far:
    // system + first user + first assistant + second user + nudge.
    let requests = completion.requests();
    assert_eq!(requests.len(), 2);
    let second = &requests[1];
    assert_eq!(second.messages.len(), 5);
    assert_eq!(second.messages[0].role, PromptRole::System);
    assert!(second.messages[1].content.contains("just got hired"));
    assert!(second.messages[2].content.contains("Congratulations"));
    assert!(second.messages[3].content.contains("nervous"));
    assert_eq!(second.messages[4].role, PromptRole::Assistant);

    // Persisted history: two user/assistant pairs, tag stripped.
    let history = store.load("sam").await.unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[1].role, Role::Assistant);
    assert_eq!(history[1].content, "Congratulations on the new job!");
    assert_eq!(history[3].content, "Day one nerves are normal, you'll do great.");
}

#[tokio::test]
async fn e2e_history_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let completion = Arc::new(ScriptedCompletion::new(&["Nice to meet you. [neutral]"]));
        let classifier = Arc::new(FixedClassifier::new(AffectLabel::Neutral));
        let store = Arc::new(FileSessionStore::new(dir.path()));
        let app = build_app(completion, classifier, store);

        let (status, _) = post_chat(
            app,
            serde_json::json!({"message": "Hi, I'm Priya", "userId": "priya"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    // A fresh gateway over the same directory sees the earlier exchange.
    let completion = Arc::new(ScriptedCompletion::new(&["Welcome back, Priya! [joy]"]));
    let classifier = Arc::new(FixedClassifier::new(AffectLabel::Neutral));
    let store = Arc::new(FileSessionStore::new(dir.path()));
    let app = build_app(completion.clone(), classifier, store.clone());

    let (status, _) = post_chat(
        app,
        serde_json::json!({"message": "Do you remember me?", "userId": "priya"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let requests = completion.requests();
    assert!(requests[0]
        .messages
        .iter()
        .any(|m| m.content.contains("I'm Priya")));

    let history = store.load("priya").await.unwrap();
    assert_eq!(history.len(), 4);
}

// ── E2E: affect resolution paths ─────────────────────────────────────────

#[tokio::test]
async fn e2e_untagged_reply_falls_back_to_classifier() {
    let dir = tempfile::tempdir().unwrap();
    let completion = Arc::new(ScriptedCompletion::new(&["I'm here for you."]));
    let classifier = Arc::new(FixedClassifier::new(AffectLabel::Sadness));
    let store = Arc::new(FileSessionStore::new(dir.path()));

    let app = build_app(completion.clone(), classifier.clone(), store);

    let (status, json) = post_chat(
        app,
        serde_json::json!({"message": "I lost my cat today", "userId": "mia"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reply"], "I'm here for you.");
    assert_eq!(json["botMood"], "sadness");
    // Once for the user message, once for the untagged reply.
    assert_eq!(classifier.calls(), 2);
    assert_eq!(completion.calls(), 1);
}

#[tokio::test]
async fn e2e_tagged_reply_skips_classifier_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let completion = Arc::new(ScriptedCompletion::new(&["That sounds scary. [fear]"]));
    let classifier = Arc::new(FixedClassifier::new(AffectLabel::Neutral));
    let store = Arc::new(FileSessionStore::new(dir.path()));

    let app = build_app(completion, classifier.clone(), store);

    let (status, json) = post_chat(
        app,
        serde_json::json!({"message": "I heard a noise downstairs", "userId": "leo"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["botMood"], "fear");
    // Only the user-mood classification ran.
    assert_eq!(classifier.calls(), 1);
}

// ── E2E: validation short-circuits the pipeline ──────────────────────────

#[tokio::test]
async fn e2e_validation_failure_touches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let completion = Arc::new(ScriptedCompletion::new(&[]));
    let classifier = Arc::new(FixedClassifier::new(AffectLabel::Neutral));
    let store = Arc::new(FileSessionStore::new(dir.path()));

    let app = build_app(completion.clone(), classifier.clone(), store.clone());

    let (status, json) = post_chat(app, serde_json::json!({"message": "no user here"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Missing message or userId");
    assert_eq!(completion.calls(), 0);
    assert_eq!(classifier.calls(), 0);
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}
