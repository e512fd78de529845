//! Session store implementations for MoodMate.

pub mod file;
pub mod in_memory;

pub use file::FileSessionStore;
pub use in_memory::InMemorySessionStore;

use std::sync::Arc;

use moodmate_config::AppConfig;
use moodmate_core::session::SessionStore;

/// Build a session store from configuration.
pub fn build_from_config(config: &AppConfig) -> Arc<dyn SessionStore> {
    match config.sessions.backend.as_str() {
        "in_memory" => Arc::new(InMemorySessionStore::new()),
        _ => Arc::new(FileSessionStore::new(config.sessions_dir())),
    }
}
