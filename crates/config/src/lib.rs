//! Configuration loading, validation, and management for MoodMate.
//!
//! Loads configuration from `~/.moodmate/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.moodmate/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Completion backend configuration
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Emotion classifier configuration
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Turn pipeline configuration
    #[serde(default)]
    pub chat: ChatConfig,

    /// Session persistence configuration
    #[serde(default)]
    pub sessions: SessionConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("completion", &self.completion)
            .field("classifier", &self.classifier)
            .field("chat", &self.chat)
            .field("sessions", &self.sessions)
            .field("gateway", &self.gateway)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// API key for the completion service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_completion_url")]
    pub api_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum-reply-length bound, in tokens
    #[serde(default = "default_max_reply_tokens")]
    pub max_reply_tokens: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_completion_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_completion_url() -> String {
    "https://api.together.xyz/v1".into()
}
fn default_model() -> String {
    "mistralai/Mixtral-8x7B-Instruct-v0.1".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_reply_tokens() -> u32 {
    100
}
fn default_completion_timeout_secs() -> u64 {
    60
}

impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_reply_tokens", &self.max_reply_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_completion_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_reply_tokens: default_max_reply_tokens(),
            timeout_secs: default_completion_timeout_secs(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// API key for the classification service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Full URL of the text-classification inference endpoint
    #[serde(default = "default_classifier_url")]
    pub api_url: String,

    /// Retries after the first failed attempt
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Fixed delay between attempts, in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_classifier_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_classifier_url() -> String {
    "https://api-inference.huggingface.co/models/j-hartmann/emotion-english-distilroberta-base"
        .into()
}
fn default_retry_attempts() -> u32 {
    1
}
fn default_retry_delay_ms() -> u64 {
    500
}
fn default_classifier_timeout_secs() -> u64 {
    20
}

impl std::fmt::Debug for ClassifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_classifier_url(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            timeout_secs: default_classifier_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Context-window budget in word-units
    #[serde(default = "default_context_budget")]
    pub context_budget: usize,

    /// Region used for helpline guidance when the caller omits one
    #[serde(default = "default_region")]
    pub default_region: String,
}

fn default_context_budget() -> usize {
    15_000
}
fn default_region() -> String {
    "global".into()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            context_budget: default_context_budget(),
            default_region: default_region(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Storage backend: "file" or "in_memory"
    #[serde(default = "default_session_backend")]
    pub backend: String,

    /// Root directory for the file backend (default: ~/.moodmate/sessions)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

fn default_session_backend() -> String {
    "file".into()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: default_session_backend(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    3000
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.moodmate/config.toml).
    ///
    /// Also checks environment variables:
    /// - `MOODMATE_API_KEY` / `TOGETHER_API_KEY` — completion key
    /// - `HUGGINGFACE_API_KEY` — classifier key
    /// - `MOODMATE_MODEL` — completion model
    /// - `PORT` — gateway port
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        // Environment variable overrides (highest priority)
        if config.completion.api_key.is_none() {
            config.completion.api_key = std::env::var("MOODMATE_API_KEY")
                .ok()
                .or_else(|| std::env::var("TOGETHER_API_KEY").ok());
        }

        if config.classifier.api_key.is_none() {
            config.classifier.api_key = std::env::var("HUGGINGFACE_API_KEY").ok();
        }

        if let Ok(model) = std::env::var("MOODMATE_MODEL") {
            config.completion.model = model;
        }

        if let Ok(port) = std::env::var("PORT") {
            config.gateway.port = port
                .parse()
                .map_err(|_| ConfigError::ValidationError(format!("invalid PORT value: {port}")))?;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".moodmate")
    }

    /// Root directory for file-backed sessions.
    pub fn sessions_dir(&self) -> PathBuf {
        self.sessions
            .dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| Self::config_dir().join("sessions"))
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.completion.temperature < 0.0 || self.completion.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "completion.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.chat.context_budget == 0 {
            return Err(ConfigError::ValidationError(
                "chat.context_budget must be > 0".into(),
            ));
        }

        match self.sessions.backend.as_str() {
            "file" | "in_memory" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "unknown session backend: {other} (expected \"file\" or \"in_memory\")"
                )));
            }
        }

        Ok(())
    }

    /// Generate a default config TOML string (for first-run setup).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            completion: CompletionConfig::default(),
            classifier: ClassifierConfig::default(),
            chat: ChatConfig::default(),
            sessions: SessionConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
