//! In-memory backend — useful for testing and ephemeral sessions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use moodmate_core::error::SessionStoreError;
use moodmate_core::session::SessionStore;
use moodmate_core::turn::ConversationTurn;

/// An in-memory backend that stores each session's history in a HashMap.
/// History is lost on process exit.
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Vec<ConversationTurn>>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of known sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn load(&self, session_id: &str) -> Result<Vec<ConversationTurn>, SessionStoreError> {
        Ok(self
            .sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save(
        &self,
        session_id: &str,
        history: &[ConversationTurn],
    ) -> Result<(), SessionStoreError> {
        self.sessions
            .write()
            .await
            .insert(session_id.to_string(), history.to_vec());
        Ok(())
    }
}
