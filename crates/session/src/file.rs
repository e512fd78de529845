//! File-based session store — one JSON document per session.
//!
//! Storage layout: `<root>/<encoded session id>.json`, each file holding the
//! ordered history array. Files are read on every load and rewritten whole
//! on every save, matching the store's overwrite semantics.
//!
//! Read failures are lenient: a missing or corrupt file is treated as an
//! absent session (with a warning) so one bad file cannot brick a user.
//! Write failures are surfaced — a reply that cannot be recorded fails the
//! turn.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, warn};

use moodmate_core::error::SessionStoreError;
use moodmate_core::session::SessionStore;
use moodmate_core::turn::ConversationTurn;

/// A session store keeping one JSON file per session under a root directory.
pub struct FileSessionStore {
    root: PathBuf,
}

impl FileSessionStore {
    /// Create a store rooted at `root`. The directory is created on first
    /// write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, session_id: &str) -> PathBuf {
        self.root.join(format!("{}.json", encode_id(session_id)))
    }
}

/// Encode an opaque session id into a safe file stem.
///
/// Alphanumerics, `-`, `_`, and `.` pass through; everything else becomes
/// `%XX` so distinct ids can never collide on disk.
fn encode_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for byte in id.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[async_trait]
impl SessionStore for FileSessionStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn load(&self, session_id: &str) -> Result<Vec<ConversationTurn>, SessionStoreError> {
        let path = self.path_for(session_id);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unreadable session file, starting fresh");
                return Ok(Vec::new());
            }
        };

        match serde_json::from_str(&content) {
            Ok(history) => Ok(history),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Corrupt session file, starting fresh");
                Ok(Vec::new())
            }
        }
    }

    async fn save(
        &self,
        session_id: &str,
        history: &[ConversationTurn],
    ) -> Result<(), SessionStoreError> {
        let path = self.path_for(session_id);

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| SessionStoreError::Storage(format!("create {}: {e}", self.root.display())))?;

        let json = serde_json::to_string_pretty(history)
            .map_err(|e| SessionStoreError::Serialization(e.to_string()))?;

        // Write to a sibling temp file and rename over the target so a
        // crash mid-write can never leave a truncated history behind.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| SessionStoreError::Storage(format!("write {}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| SessionStoreError::Storage(format!("rename {}: {e}", path.display())))?;

        debug!(path = %path.display(), turns = history.len(), "Session persisted");
        Ok(())
    }
}
