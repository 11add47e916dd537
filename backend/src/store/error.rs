//! Table store error types

use thiserror::Error;

/// Errors raised while talking to the table store
///
/// These never cross the `LeadsSource` boundary; they are turned into a
/// user-visible notice there.
#[derive(Error, Debug)]
pub enum StoreError {
    /// URL or key is absent or blank
    #[error("Supabase credentials are not set. Please set SUPABASE_URL and SUPABASE_ANON_KEY environment variables.")]
    MissingCredentials,

    /// Transport-level failure (DNS, connect, timeout, body read)
    #[error("Failed to reach table store: {0}")]
    Request(#[from] reqwest::Error),

    /// Store answered with a non-success status
    #[error("Table store returned error status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, for display
        body: String,
    },

    /// Body was not a JSON array of objects
    #[error("Failed to decode table rows: {0}")]
    Decode(String),
}
