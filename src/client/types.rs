// Response payloads from the dashboard backend
// Field names follow the backend's JSON

use serde::Deserialize;
use serde_json::{Map, Value};

/// One bar of the role distribution chart
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoleCount {
    pub role: String,
    pub count: usize,
}

/// Leads table with derived columns and chart data
#[derive(Debug, Clone, Deserialize)]
pub struct LeadsData {
    pub total: usize,
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
    pub feature_columns: Vec<String>,
    #[serde(default)]
    pub role_distribution: Vec<RoleCount>,
    pub notice: Option<String>,
}

impl LeadsData {
    /// Text shown in a table cell: strings as-is, null or missing as empty
    pub fn cell(&self, row: usize, column: &str) -> String {
        match self.rows.get(row).and_then(|r| r.get(column)) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// Model availability for the prediction tab
#[derive(Debug, Clone, Deserialize)]
pub struct ModelStatus {
    pub available: bool,
    #[serde(default)]
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    pub schema_matches: Option<bool>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassProbability {
    pub label: String,
    pub probability: f64,
}

/// Prediction result
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub prediction: String,
    #[serde(default)]
    pub probabilities: Vec<ClassProbability>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatStatus {
    pub enabled: bool,
    pub message: Option<String>,
}

/// One transcript entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatEntry {
    pub role: String,
    pub content: String,
}

impl ChatEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == "user"
    }
}

/// Reply to a chat send
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub session_id: String,
    pub reply: Option<String>,
    #[serde(default)]
    pub ignored: bool,
    #[serde(default)]
    pub transcript: Vec<ChatEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionCreated {
    pub session_id: String,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
