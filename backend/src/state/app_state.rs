//! Shared application state
//!
//! One instance per process, shared by all request handlers.

use crate::cache::Memo;
use crate::chat::{ChatCompletion, ChatRelay, GeminiChatClient};
use crate::config::Config;
use crate::model::{load_model, ModelAvailability};
use crate::store::LeadsSource;
use std::sync::Arc;

/// State shared across handlers
pub type SharedState = Arc<AppState>;

/// Application state: adapters plus their caches
pub struct AppState {
    /// Loaded configuration
    pub config: Config,
    /// Cached leads table
    pub leads: LeadsSource,
    /// Conversational relay
    pub chat: ChatRelay,
    model: Memo<ModelAvailability>,
}

impl AppState {
    /// Build state from configuration, using Gemini for chat when a key is set
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()?;
        let completion = GeminiChatClient::from_config(http.clone(), &config.chat)
            .map(|client| Arc::new(client) as Arc<dyn ChatCompletion>);
        Ok(Self::with_chat_completion(config, http, completion))
    }

    /// Build state with an explicit chat endpoint (or none)
    pub fn with_chat_completion(
        config: Config,
        http: reqwest::Client,
        completion: Option<Arc<dyn ChatCompletion>>,
    ) -> Self {
        let leads = LeadsSource::new(http, config.store.clone());
        let chat = ChatRelay::new(
            completion,
            config.chat.history_limit,
            config.http_timeout(),
        )
        .with_idle_timeout(config.chat.session_idle());
        Self {
            config,
            leads,
            chat,
            model: Memo::new("model", None),
        }
    }

    /// Model artifact, loaded on first use and kept for the process lifetime
    pub async fn model(&self) -> Arc<ModelAvailability> {
        self.model
            .get_or_load(|| load_model(&self.config.model.path))
            .await
    }

    /// Re-read the artifact from disk
    pub async fn reload_model(&self) -> Arc<ModelAvailability> {
        self.model.invalidate().await;
        self.model().await
    }
}
