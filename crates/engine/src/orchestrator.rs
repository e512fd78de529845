//! The turn orchestrator — one incoming message in, one labeled reply out.
//!
//! Coordinates classification, history load, trimming, composition,
//! generation, tagging, and persistence. The load→persist span for a given
//! session runs under that session's lock: two concurrent turns for one
//! user would otherwise both load a history of length N and each persist
//! N+1, silently losing a pair. Distinct sessions proceed fully in
//! parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use moodmate_config::AppConfig;
use moodmate_core::classifier::EmotionClassifier;
use moodmate_core::completion::{CompletionClient, CompletionRequest};
use moodmate_core::error::TurnError;
use moodmate_core::session::SessionStore;
use moodmate_core::turn::{ConversationTurn, TurnResult};

use crate::context::{trim_history, DEFAULT_CONTEXT_BUDGET};
use crate::prompt::{compose, system_instructions};
use crate::tagger::resolve;

/// Reply used when generation fails entirely.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't reach my brain right now 😞";

/// Hands out one async mutex per session id.
///
/// The registry's own lock is a briefly-held std mutex; the per-session
/// locks are tokio mutexes held across the turn's await points.
struct SessionLocks {
    inner: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl SessionLocks {
    fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    async fn acquire(&self, session_id: &str) -> tokio::sync::OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());

            // Evict idle entries when the map grows large
            if map.len() > 10_000 {
                map.retain(|_, l| Arc::strong_count(l) > 1);
            }

            map.entry(session_id.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

/// Coordinates one conversational turn end to end.
///
/// All collaborators are injected at construction so tests can swap in
/// stubs for the completion service, classifier, and store.
pub struct TurnOrchestrator {
    completion: Arc<dyn CompletionClient>,
    classifier: Arc<dyn EmotionClassifier>,
    store: Arc<dyn SessionStore>,
    model: String,
    temperature: f32,
    max_reply_tokens: u32,
    context_budget: usize,
    default_region: String,
    locks: SessionLocks,
}

impl TurnOrchestrator {
    /// Create a new orchestrator with default settings.
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        classifier: Arc<dyn EmotionClassifier>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            completion,
            classifier,
            store,
            model: String::new(),
            temperature: 0.7,
            max_reply_tokens: 100,
            context_budget: DEFAULT_CONTEXT_BUDGET,
            default_region: "global".into(),
            locks: SessionLocks::new(),
        }
    }

    /// Set the completion model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the maximum-reply-length bound.
    pub fn with_max_reply_tokens(mut self, max: u32) -> Self {
        self.max_reply_tokens = max;
        self
    }

    /// Set the context-window budget in word-units.
    pub fn with_context_budget(mut self, budget: usize) -> Self {
        self.context_budget = budget;
        self
    }

    /// Set the region used when the caller doesn't supply one.
    pub fn with_default_region(mut self, region: impl Into<String>) -> Self {
        self.default_region = region.into();
        self
    }

    /// Apply chat and completion settings from configuration.
    pub fn with_config(self, config: &AppConfig) -> Self {
        self.with_model(config.completion.model.clone())
            .with_temperature(config.completion.temperature)
            .with_max_reply_tokens(config.completion.max_reply_tokens)
            .with_context_budget(config.chat.context_budget)
            .with_default_region(config.chat.default_region.clone())
    }

    /// Run one turn for `session_id`.
    ///
    /// On success the persisted history has grown by exactly two contiguous
    /// entries: the user's message, then the assistant's clean reply. On
    /// any failure the persisted history is untouched — a user turn is
    /// never recorded without its paired assistant turn.
    pub async fn handle_turn(
        &self,
        session_id: &str,
        message: &str,
        region: Option<&str>,
    ) -> Result<TurnResult, TurnError> {
        if session_id.trim().is_empty() || message.trim().is_empty() {
            return Err(TurnError::Validation);
        }

        // Best-effort user mood; the classifier absorbs its own failures.
        let user_mood = self.classifier.classify(message).await;

        // Critical section: load → mutate → persist for this session.
        let _guard = self.locks.acquire(session_id).await;

        let mut history = match self.store.load(session_id).await {
            Ok(history) => history,
            Err(e) => {
                warn!(session = %session_id, error = %e, "History load failed, starting fresh");
                Vec::new()
            }
        };
        let prior_len = history.len();

        history.push(ConversationTurn::user(message));

        let trimmed = trim_history(&history, self.context_budget);
        debug!(
            session = %session_id,
            total = history.len(),
            in_window = trimmed.len(),
            "Context window built"
        );

        let region = region.filter(|r| !r.trim().is_empty()).unwrap_or(&self.default_region);
        let messages = compose(&system_instructions(region), trimmed);

        let raw_reply = match self
            .completion
            .complete(CompletionRequest {
                model: self.model.clone(),
                messages,
                temperature: self.temperature,
                max_reply_tokens: self.max_reply_tokens,
            })
            .await
        {
            Ok(reply) => reply,
            Err(source) => {
                // The working copy is discarded: persisted history still
                // matches what was loaded, so no orphan user turn exists.
                warn!(session = %session_id, error = %source, "Generation failed, turn not persisted");
                return Err(TurnError::Generation { user_mood, source });
            }
        };

        let (clean, bot_mood) = resolve(&raw_reply, self.classifier.as_ref()).await;

        history.push(ConversationTurn::assistant(clean.clone()));

        if let Err(source) = self.store.save(session_id, &history).await {
            warn!(session = %session_id, error = %source, "History write failed after generation");
            return Err(TurnError::Persistence {
                user_mood,
                bot_mood,
                source,
            });
        }

        info!(
            session = %session_id,
            history = history.len(),
            grew_by = history.len() - prior_len,
            %user_mood,
            %bot_mood,
            "Turn completed"
        );

        Ok(TurnResult {
            reply: clean,
            user_mood,
            bot_mood,
        })
    }
}
