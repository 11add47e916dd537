//! Chat relay error types

use thiserror::Error;

/// Message shown when the chat API key is missing
pub const CHAT_DISABLED_MESSAGE: &str =
    "Chat is disabled. Please set the GEMINI_API_KEY environment variable.";

/// Errors from the chat relay
///
/// The `Display` text is what the user sees; nothing is retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    /// No API key configured
    #[error("Chat is disabled. Please set the GEMINI_API_KEY environment variable.")]
    Disabled,

    /// Session id not known to the relay
    #[error("Chat session not found: {0}")]
    SessionNotFound(String),

    /// Request could not be sent or the body could not be read
    #[error("Failed to reach chat API: {0}")]
    Request(String),

    /// Endpoint answered 429
    #[error("Chat API rate limit exceeded (HTTP 429): {0}")]
    RateLimited(String),

    /// Endpoint answered with another non-success status
    #[error("Chat API returned error status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Prompt rejected by the provider's safety filters
    #[error("Chat API blocked the prompt: {0}")]
    Blocked(String),

    /// Response was not in the expected shape
    #[error("Failed to parse chat API response: {0}")]
    Decode(String),

    /// Response contained no text
    #[error("Chat API returned an empty reply")]
    EmptyReply,

    /// No answer within the configured timeout
    #[error("Chat API did not answer within {0} seconds")]
    Timeout(u64),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::Request(err.without_url().to_string())
    }
}
