//! Chat data models
//!
//! Defines transcript entries and chat sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::transcript::Transcript;

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user
    User,
    /// Message from the assistant/AI
    Assistant,
}

impl MessageRole {
    /// Convert the role to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// One turn of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Who sent it
    pub role: MessageRole,
    /// Message text
    pub content: String,
}

impl TranscriptEntry {
    /// Entry sent by the user
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Entry returned by the chat endpoint
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// An in-memory conversation, scoped to one client session
#[derive(Debug, Clone)]
pub struct ChatSession {
    /// Session identifier
    pub id: Uuid,
    /// Conversation so far
    pub transcript: Transcript,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// When the transcript last changed
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// Create an empty session
    pub fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            transcript: Transcript::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append an entry and bump `updated_at`
    pub fn append(&mut self, entry: TranscriptEntry) {
        self.transcript.push(entry);
        self.updated_at = Utc::now();
    }
}
