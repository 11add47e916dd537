//! Chat API endpoints
//!
//! Thin HTTP layer over `ChatRelay`. Transcripts live in memory, one per
//! session id handed out by `create_session`, until the session is deleted or
//! sits idle past `CHAT_SESSION_IDLE_SECS`.

use crate::chat::{ChatError, SendOutcome, TranscriptEntry, CHAT_DISABLED_MESSAGE};
use crate::error::AppError;
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Chat availability
#[derive(Debug, Serialize)]
pub struct ChatStatusResponse {
    /// Whether a chat API key is configured
    pub enabled: bool,
    /// Why chat is disabled, if it is
    pub message: Option<String>,
}

/// Newly created session
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Session identifier
    pub session_id: Uuid,
}

/// A session's transcript
#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    /// Session identifier
    pub session_id: Uuid,
    /// Conversation, oldest first
    pub transcript: Vec<TranscriptEntry>,
}

/// Request to send a message
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Session to append to; a new session is started when absent
    #[serde(default)]
    pub session_id: Option<Uuid>,
    /// Message content
    pub message: String,
}

/// Reply to a send
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    /// Session the message went to; absent for a blank message sent
    /// without a session
    pub session_id: Option<Uuid>,
    /// Assistant reply, absent when the message was blank
    pub reply: Option<String>,
    /// True when the message was blank and nothing was sent
    pub ignored: bool,
    /// Transcript after the send
    pub transcript: Vec<TranscriptEntry>,
}

fn ensure_enabled(state: &SharedState) -> Result<(), AppError> {
    if state.chat.is_enabled() {
        Ok(())
    } else {
        Err(ChatError::Disabled.into())
    }
}

/// GET /api/chat/status - Whether the chat tab is usable
pub async fn chat_status(State(state): State<SharedState>) -> Json<ChatStatusResponse> {
    let enabled = state.chat.is_enabled();
    Json(ChatStatusResponse {
        enabled,
        message: (!enabled).then(|| CHAT_DISABLED_MESSAGE.to_string()),
    })
}

/// POST /api/chat/sessions - Start a new conversation
pub async fn create_session(
    State(state): State<SharedState>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    ensure_enabled(&state)?;
    let session_id = state.chat.create_session().await;
    Ok((StatusCode::CREATED, Json(SessionResponse { session_id })))
}

/// GET /api/chat/sessions/:id - Transcript of a session
pub async fn get_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TranscriptResponse>, AppError> {
    let transcript = state
        .chat
        .transcript(id)
        .await
        .ok_or_else(|| ChatError::SessionNotFound(id.to_string()))?;
    Ok(Json(TranscriptResponse {
        session_id: id,
        transcript,
    }))
}

/// DELETE /api/chat/sessions/:id - End a session and drop its transcript
pub async fn delete_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.chat.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ChatError::SessionNotFound(id.to_string()).into())
    }
}

/// POST /api/chat - Relay a user message
///
/// Upstream failures answer with an error status; the user's entry stays in
/// the transcript either way.
pub async fn send_message(
    State(state): State<SharedState>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, AppError> {
    ensure_enabled(&state)?;

    // Blank input is a no-op; it must not start a session either
    if request.message.trim().is_empty() {
        let transcript = match request.session_id {
            Some(id) => state.chat.transcript(id).await.unwrap_or_default(),
            None => Vec::new(),
        };
        return Ok(Json(SendMessageResponse {
            session_id: request.session_id,
            reply: None,
            ignored: true,
            transcript,
        }));
    }

    let session_id = match request.session_id {
        Some(id) => id,
        None => state.chat.create_session().await,
    };

    let outcome = state.chat.send(session_id, &request.message).await?;
    let transcript = state.chat.transcript(session_id).await.unwrap_or_default();

    match outcome {
        SendOutcome::Ignored => Ok(Json(SendMessageResponse {
            session_id: Some(session_id),
            reply: None,
            ignored: true,
            transcript,
        })),
        SendOutcome::Replied { reply } => Ok(Json(SendMessageResponse {
            session_id: Some(session_id),
            reply: Some(reply),
            ignored: false,
            transcript,
        })),
        SendOutcome::Failed { error } => Err(error.into()),
    }
}
