//! Inference adapter error types

use thiserror::Error;

/// Why an artifact could not be loaded
///
/// Logged, then collapsed into `ModelAvailability::Unavailable`.
#[derive(Error, Debug)]
pub enum ModelLoadError {
    /// File missing or unreadable
    #[error("Failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    /// File is not a valid artifact document
    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    /// Artifact written by an incompatible exporter
    #[error("Unsupported model artifact format version {0}")]
    UnsupportedVersion(u32),

    /// Artifact shapes do not line up
    #[error("Invalid model artifact: {0}")]
    Invalid(String),
}

/// Errors raised while predicting
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    /// Input columns differ from the columns the model was trained on
    #[error("Feature columns do not match the model (missing: [{}], unexpected: [{}])", .missing.join(", "), .unexpected.join(", "))]
    SchemaMismatch {
        /// Model columns absent from the input
        missing: Vec<String>,
        /// Input columns the model does not know
        unexpected: Vec<String>,
    },

    /// No rows were supplied
    #[error("No input rows to predict")]
    EmptyInput,
}
