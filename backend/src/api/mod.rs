//! API module
//!
//! Contains HTTP request handlers for the three dashboard sections and the
//! router that wires them together.

pub mod chat;
pub mod health;
pub mod leads;
pub mod predict;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::SharedState;

/// Build the API router (without middleware)
pub fn router(state: SharedState) -> Router {
    Router::new()
        // Health check and hello world
        .route("/", get(health::hello_world))
        .route("/api/health", get(health::health_check))
        // Leads dashboard
        .route("/api/leads", get(leads::get_leads))
        .route("/api/leads/refresh", post(leads::refresh_leads))
        // Role prediction
        .route("/api/model", get(predict::get_model_status))
        .route("/api/model/reload", post(predict::reload_model))
        .route("/api/predict", post(predict::predict))
        // Chat relay
        .route("/api/chat", post(chat::send_message))
        .route("/api/chat/status", get(chat::chat_status))
        .route("/api/chat/sessions", post(chat::create_session))
        .route(
            "/api/chat/sessions/:id",
            get(chat::get_session).delete(chat::delete_session),
        )
        .with_state(state)
}
