// Application state management
// Holds what each tab shows, plus the per-section pending flags that keep one
// request of each kind in flight at a time.

use crate::client::{
    ChatEntry, ChatStatus, ClientError, LeadsData, ModelStatus, Prediction, Request, Response,
};
use std::collections::HashMap;

/// Top-level tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Prediction,
    Chat,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Dashboard, Tab::Prediction, Tab::Chat];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Dashboard => "Leads Dashboard",
            Tab::Prediction => "AI Prediction",
            Tab::Chat => "Chat",
        }
    }
}

/// Data loaded from the backend, with its request status
#[derive(Debug, Clone)]
pub struct Section<T> {
    pub data: Option<T>,
    pub pending: bool,
    pub error: Option<String>,
}

impl<T> Default for Section<T> {
    fn default() -> Self {
        Self {
            data: None,
            pending: false,
            error: None,
        }
    }
}

impl<T> Section<T> {
    /// Mark a request as started; false if one is already in flight
    pub fn begin(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Store a finished request's result; errors keep the previous data
    pub fn finish(&mut self, result: Result<T, ClientError>) {
        self.pending = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }
}

/// Prediction tab: model status, form inputs, last result
#[derive(Debug, Clone, Default)]
pub struct PredictionState {
    pub model: Section<ModelStatus>,
    /// (feature column, text entered), in table column order
    pub inputs: Vec<(String, String)>,
    pub result: Section<Prediction>,
}

impl PredictionState {
    /// Align the form with the table's feature columns, keeping typed values
    pub fn sync_inputs(&mut self, feature_columns: &[String]) {
        let previous: HashMap<String, String> = self.inputs.drain(..).collect();
        self.inputs = feature_columns
            .iter()
            .map(|column| {
                let value = previous.get(column).cloned().unwrap_or_default();
                (column.clone(), value)
            })
            .collect();
    }

    pub fn features(&self) -> HashMap<String, String> {
        self.inputs.iter().cloned().collect()
    }
}

/// Chat tab: one conversation with the relay
#[derive(Debug, Clone, Default)]
pub struct ChatState {
    pub status: Section<ChatStatus>,
    pub session_id: Option<String>,
    pub transcript: Vec<ChatEntry>,
    pub draft: String,
    pub pending: bool,
    pub error: Option<String>,
}

impl ChatState {
    /// Whether the backend reported chat as usable
    pub fn enabled(&self) -> bool {
        self.status.data.as_ref().map(|s| s.enabled).unwrap_or(false)
    }

    /// Take the draft as a message to send; None for blank drafts
    pub fn take_draft(&mut self) -> Option<String> {
        if self.draft.trim().is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.draft))
    }
}

/// UI-specific state
#[derive(Debug, Clone)]
pub struct UiState {
    /// Whether to show the activity log
    pub activity_visible: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            activity_visible: true,
        }
    }
}

/// Main application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub active_tab: Tab,
    pub leads: Section<LeadsData>,
    pub prediction: PredictionState,
    pub chat: ChatState,
    pub ui_state: UiState,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            active_tab: Tab::Dashboard,
            leads: Section::default(),
            prediction: PredictionState::default(),
            chat: ChatState::default(),
            ui_state: UiState::default(),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the section `request` belongs to as pending
    ///
    /// Returns false when a request of the same kind is still running; the
    /// caller then drops the request.
    pub fn begin(&mut self, request: &Request) -> bool {
        match request {
            Request::LoadLeads | Request::RefreshLeads => self.leads.begin(),
            Request::LoadModelStatus | Request::ReloadModel => self.prediction.model.begin(),
            Request::Predict(_) => self.prediction.result.begin(),
            Request::LoadChatStatus => self.chat.status.begin(),
            Request::SendChat { message, .. } => {
                if self.chat.pending {
                    return false;
                }
                self.chat.pending = true;
                self.chat.error = None;
                self.chat.transcript.push(ChatEntry::user(message.clone()));
                true
            }
            Request::ResetChat { .. } => {
                if self.chat.pending {
                    return false;
                }
                self.chat.pending = true;
                true
            }
        }
    }

    /// Fold a backend response into the state; returns a line for the activity log
    pub fn apply(&mut self, response: Response) -> String {
        match response {
            Response::Leads(result) => {
                let line = match &result {
                    Ok(data) => format!("Loaded {} leads", data.total),
                    Err(e) => format!("Failed to load leads: {}", e),
                };
                if let Ok(data) = &result {
                    self.prediction.sync_inputs(&data.feature_columns);
                }
                self.leads.finish(result);
                line
            }
            Response::ModelStatus(result) => {
                let line = match &result {
                    Ok(status) if status.available => "Model loaded".to_string(),
                    Ok(_) => "Model unavailable".to_string(),
                    Err(e) => format!("Failed to check model: {}", e),
                };
                self.prediction.model.finish(result);
                line
            }
            Response::Prediction(result) => {
                let line = match &result {
                    Ok(p) => format!("Predicted primary role: {}", p.prediction),
                    Err(e) => format!("Prediction failed: {}", e),
                };
                self.prediction.result.finish(result);
                line
            }
            Response::ChatStatus(result) => {
                let line = match &result {
                    Ok(s) if s.enabled => "Chat enabled".to_string(),
                    Ok(_) => "Chat disabled".to_string(),
                    Err(e) => format!("Failed to check chat: {}", e),
                };
                self.chat.status.finish(result);
                line
            }
            Response::Chat { session_id, result } => {
                self.chat.pending = false;
                if session_id.is_some() {
                    self.chat.session_id = session_id;
                }
                match result {
                    Ok(reply) => {
                        let line = match (&reply.reply, reply.ignored) {
                            (_, true) => "Blank message ignored".to_string(),
                            (Some(text), false) => {
                                format!("Chat reply received ({} chars)", text.len())
                            }
                            (None, false) => "Chat reply received".to_string(),
                        };
                        self.chat.session_id = Some(reply.session_id);
                        self.chat.transcript = reply.transcript;
                        self.chat.error = None;
                        line
                    }
                    // The user's entry stays in the transcript
                    Err(e) => {
                        let line = format!("Chat failed: {}", e);
                        self.chat.error = Some(e.to_string());
                        line
                    }
                }
            }
            Response::ChatReset(result) => {
                self.chat.pending = false;
                match result {
                    // The backend dropped the session; the next send starts a new one
                    Ok(()) => {
                        self.chat.session_id = None;
                        self.chat.transcript.clear();
                        self.chat.error = None;
                        "Chat cleared".to_string()
                    }
                    Err(e) => {
                        let line = format!("Failed to clear chat: {}", e);
                        self.chat.error = Some(e.to_string());
                        line
                    }
                }
            }
        }
    }
}
