//! Conversational relay
//!
//! Keeps one transcript per session and forwards it to the chat endpoint on
//! every new user turn.
//!
//! Send flow (Idle -> AwaitingReply -> Idle):
//! - blank message: nothing happens
//! - otherwise the user entry is appended before the remote call
//! - on success the reply is appended; on failure only the user entry stays
//!
//! Sessions untouched for longer than the idle timeout are dropped whenever a
//! session is created or a message is relayed.

use crate::chat::client::ChatCompletion;
use crate::chat::error::ChatError;
use crate::chat::models::{ChatSession, TranscriptEntry};
use crate::config::DEFAULT_SESSION_IDLE_SECS;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Result of a send action
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Message was blank; transcript untouched
    Ignored,
    /// Reply received and appended
    Replied {
        /// Assistant reply text
        reply: String,
    },
    /// Remote call failed; the user entry was kept
    Failed {
        /// What went wrong; its text is shown to the user
        error: ChatError,
    },
}

/// Relay between client sessions and the chat endpoint
pub struct ChatRelay {
    completion: Option<Arc<dyn ChatCompletion>>,
    sessions: RwLock<HashMap<Uuid, ChatSession>>,
    history_limit: usize,
    timeout: Duration,
    idle_timeout: Duration,
}

impl ChatRelay {
    /// Create a relay; `completion = None` leaves chat disabled
    pub fn new(
        completion: Option<Arc<dyn ChatCompletion>>,
        history_limit: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            completion,
            sessions: RwLock::new(HashMap::new()),
            history_limit: history_limit.max(1),
            timeout,
            idle_timeout: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
        }
    }

    /// Drop sessions whose transcript has not changed for `idle_timeout`
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Whether a chat endpoint is configured
    pub fn is_enabled(&self) -> bool {
        self.completion.is_some()
    }

    /// Start a new, empty session
    pub async fn create_session(&self) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.write().await;
        self.evict_idle(&mut sessions);
        sessions.insert(id, ChatSession::new(id));
        tracing::debug!(session_id = %id, "Created chat session");
        id
    }

    /// Number of sessions currently held
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Copy of a session's transcript
    pub async fn transcript(&self, session_id: Uuid) -> Option<Vec<TranscriptEntry>> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .map(|s| s.transcript.entries().to_vec())
    }

    /// End a session and drop its transcript; false if the session is unknown
    pub async fn remove(&self, session_id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&session_id).is_some();
        if removed {
            tracing::debug!(session_id = %session_id, "Removed chat session");
        }
        removed
    }

    fn evict_idle(&self, sessions: &mut HashMap<Uuid, ChatSession>) {
        let now = Utc::now();
        let before = sessions.len();
        sessions.retain(|_, session| {
            // A clock step backwards counts as fresh
            let idle = (now - session.updated_at).to_std().unwrap_or_default();
            idle <= self.idle_timeout
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "Evicted idle chat sessions");
        }
    }

    /// Relay one user message
    ///
    /// Unknown session ids start a new session. The session lock is never
    /// held across the remote call, so two concurrent sends on one session
    /// may interleave as user, user, reply, reply; each reply is appended
    /// when it arrives. Clients are expected to wait for a reply before
    /// sending again.
    pub async fn send(&self, session_id: Uuid, message: &str) -> Result<SendOutcome, ChatError> {
        let completion = self.completion.as_ref().ok_or(ChatError::Disabled)?;

        if message.trim().is_empty() {
            return Ok(SendOutcome::Ignored);
        }

        let context = {
            let mut sessions = self.sessions.write().await;
            self.evict_idle(&mut sessions);
            let session = sessions
                .entry(session_id)
                .or_insert_with(|| ChatSession::new(session_id));
            session.append(TranscriptEntry::user(message));
            session.transcript.window(self.history_limit).to_vec()
        };

        tracing::info!(
            session_id = %session_id,
            context_len = context.len(),
            "Relaying chat message"
        );

        let result = match tokio::time::timeout(self.timeout, completion.complete(&context)).await
        {
            Ok(result) => result,
            Err(_) => Err(ChatError::Timeout(self.timeout.as_secs())),
        };

        match result {
            Ok(reply) => {
                if let Some(session) = self.sessions.write().await.get_mut(&session_id) {
                    session.append(TranscriptEntry::assistant(reply.clone()));
                }
                tracing::info!(
                    session_id = %session_id,
                    response_len = reply.len(),
                    "Chat reply received"
                );
                Ok(SendOutcome::Replied { reply })
            }
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Chat relay failed");
                Ok(SendOutcome::Failed { error: e })
            }
        }
    }
}
