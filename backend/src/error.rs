//! Error types and error handling for the application
//!
//! This module defines the HTTP-facing error type. Every variant converts to
//! a JSON body `{ "error": <display text>, "status": <code> }` so the
//! dashboard can show the text as-is.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::chat::ChatError;
use crate::model::{PredictError, MODEL_UNAVAILABLE_MESSAGE};

/// Message shown when prediction is attempted without any table data
pub const NO_DATA_MESSAGE: &str = "Cannot determine feature columns without data.";

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// No usable model artifact is loaded
    #[error("{}", MODEL_UNAVAILABLE_MESSAGE)]
    ModelUnavailable,

    /// Leads table is empty, so feature columns are unknown
    #[error("{}", NO_DATA_MESSAGE)]
    NoData,

    /// Request body is well-formed JSON but semantically invalid
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Prediction failed (schema mismatch, empty input)
    #[error(transparent)]
    Predict(#[from] PredictError),

    /// Chat relay failure
    #[error(transparent)]
    Chat(#[from] ChatError),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NoData => StatusCode::BAD_REQUEST,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Predict(_) => StatusCode::BAD_REQUEST,
            AppError::Chat(ChatError::Disabled) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Chat(ChatError::SessionNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Chat(ChatError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Chat(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
