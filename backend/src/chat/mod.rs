//! Chat module
//!
//! Conversational relay to a remote LLM chat endpoint with in-memory,
//! per-session transcripts.

pub mod client;
pub mod error;
pub mod gemini_types;
pub mod models;
pub mod relay;
pub mod transcript;

pub use client::{ChatCompletion, GeminiChatClient};
pub use error::{ChatError, CHAT_DISABLED_MESSAGE};
pub use models::{ChatSession, MessageRole, TranscriptEntry};
pub use relay::{ChatRelay, SendOutcome};
pub use transcript::Transcript;
