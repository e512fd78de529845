//! SessionStore trait — per-user durable conversation history.
//!
//! A session is identified by an opaque, caller-supplied string key and
//! owns exactly one ordered history. Sessions are created implicitly on
//! first save; loading an absent session yields an empty history.
//!
//! Implementations: file-backed (one JSON document per session), in-memory
//! (for testing and ephemeral runs).

use async_trait::async_trait;

use crate::error::SessionStoreError;
use crate::turn::ConversationTurn;

/// Key-value access to per-session ordered history.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The backend name (e.g., "file", "in_memory").
    fn name(&self) -> &str;

    /// Load the full history for a session. Absent session ⇒ empty vec.
    async fn load(&self, session_id: &str) -> Result<Vec<ConversationTurn>, SessionStoreError>;

    /// Persist the full history for a session, overwriting any prior value.
    async fn save(
        &self,
        session_id: &str,
        history: &[ConversationTurn],
    ) -> Result<(), SessionStoreError>;
}
