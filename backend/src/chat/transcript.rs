//! Append-only conversation transcript

use crate::chat::models::{MessageRole, TranscriptEntry};
use serde::Serialize;

/// Ordered list of chat turns
///
/// Entries are only ever appended. Role alternation is not enforced: a user
/// whose previous send failed simply has two user entries in a row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    /// All entries, oldest first
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True before the first message
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entries to send as context
    ///
    /// At most `limit` entries, advanced past any leading assistant entries
    /// so the window always opens with a user turn.
    pub fn window(&self, limit: usize) -> &[TranscriptEntry] {
        let start = self.entries.len().saturating_sub(limit);
        let tail = &self.entries[start..];
        let first_user = tail
            .iter()
            .position(|e| e.role == MessageRole::User)
            .unwrap_or(tail.len());
        &tail[first_user..]
    }
}
