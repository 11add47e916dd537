//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default Gemini API base URL
pub const DEFAULT_GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Gemini model name
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default idle lifetime of a chat session (one hour)
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 3600;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Table store configuration
    pub store: StoreConfig,
    /// Model artifact configuration
    pub model: ModelConfig,
    /// Chat relay configuration
    pub chat: ChatConfig,
    /// Timeout applied to every outbound HTTP request
    pub http_timeout_secs: u64,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Table store configuration
#[derive(Clone)]
pub struct StoreConfig {
    /// Base URL of the table store (`SUPABASE_URL`)
    pub url: Option<String>,
    /// Access key (`SUPABASE_ANON_KEY`, falling back to `SUPABASE_KEY`)
    pub key: Option<String>,
    /// Table holding the leads
    pub table: String,
    /// Expiry of the cached leads frame (None = until refreshed)
    pub cache_ttl: Option<Duration>,
}

/// Model artifact configuration
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Path of the serialized preprocessor + classifier
    pub path: PathBuf,
}

/// Chat relay configuration
#[derive(Clone)]
pub struct ChatConfig {
    /// Gemini API key (None disables the chat tab)
    pub api_key: Option<String>,
    /// Gemini model name
    pub model: String,
    /// Gemini API base URL
    pub base_url: String,
    /// Maximum number of transcript entries sent as context
    pub history_limit: usize,
    /// Sessions untouched for this many seconds are dropped
    pub session_idle_secs: u64,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            store: StoreConfig::from_env(),
            model: ModelConfig {
                path: non_empty_var("MODEL_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("models/baseline_model.json")),
            },
            chat: ChatConfig {
                api_key: non_empty_var("GEMINI_API_KEY"),
                model: non_empty_var("GEMINI_MODEL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                base_url: non_empty_var("GEMINI_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE_URL.to_string()),
                history_limit: env::var("CHAT_HISTORY_LIMIT")
                    .ok()
                    .and_then(|n| n.parse().ok())
                    .filter(|n| *n > 0)
                    .unwrap_or(40),
                session_idle_secs: env::var("CHAT_SESSION_IDLE_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .filter(|t| *t > 0)
                    .unwrap_or(DEFAULT_SESSION_IDLE_SECS),
            },
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .filter(|t| *t > 0)
                .unwrap_or(30),
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Outbound HTTP timeout as a `Duration`
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl ChatConfig {
    /// Idle lifetime of a chat session as a `Duration`
    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

impl StoreConfig {
    /// Table store settings from the environment
    ///
    /// The key is `SUPABASE_ANON_KEY`, falling back to `SUPABASE_KEY`.
    pub fn from_env() -> Self {
        Self {
            url: non_empty_var("SUPABASE_URL"),
            key: first_non_empty(&["SUPABASE_ANON_KEY", "SUPABASE_KEY"]),
            table: non_empty_var("LEADS_TABLE").unwrap_or_else(|| "leads".to_string()),
            cache_ttl: env::var("LEADS_CACHE_TTL_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .map(Duration::from_secs),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 8080,
                host: "0.0.0.0".to_string(),
            },
            store: StoreConfig {
                url: None,
                key: None,
                table: "leads".to_string(),
                cache_ttl: None,
            },
            model: ModelConfig {
                path: PathBuf::from("models/baseline_model.json"),
            },
            chat: ChatConfig {
                api_key: None,
                model: DEFAULT_GEMINI_MODEL.to_string(),
                base_url: DEFAULT_GEMINI_API_BASE_URL.to_string(),
                history_limit: 40,
                session_idle_secs: DEFAULT_SESSION_IDLE_SECS,
            },
            http_timeout_secs: 30,
        }
    }
}

// Secrets never reach the logs.
impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("table", &self.table)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("history_limit", &self.history_limit)
            .field("session_idle_secs", &self.session_idle_secs)
            .finish()
    }
}

/// Read an environment variable, treating blank values as unset
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Return the first variable in `names` that holds a non-empty value
fn first_non_empty(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| non_empty_var(name))
}
