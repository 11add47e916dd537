// Backend client
// Blocking HTTP calls to the dashboard backend, run off the UI thread by `Worker`

pub mod types;
pub mod worker;

pub use types::*;
pub use worker::{Request, Response, Worker};

use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Backend address used when `DASHBOARD_BACKEND_URL` is unset
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8080";

/// Shown when the leads table is empty
pub const NO_DATA_NOTICE: &str = "No data available or failed to load.";

/// Shown on the prediction tab when there are no feature columns
pub const NO_DATA_MESSAGE: &str = "Cannot determine feature columns without data.";

/// Chat replies can be slow; everything else answers quickly
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Backend unreachable: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx answer; `message` is the backend's error text when it sent one
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },
}

/// Typed wrapper over the backend's JSON API
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { base_url, http })
    }

    /// Client for `DASHBOARD_BACKEND_URL`, or the local default
    pub fn from_env() -> Result<Self, ClientError> {
        let url = std::env::var("DASHBOARD_BACKEND_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        Self::new(url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn leads(&self) -> Result<LeadsData, ClientError> {
        self.fetch(self.http.get(self.url("/api/leads")))
    }

    pub fn refresh_leads(&self) -> Result<LeadsData, ClientError> {
        self.fetch(self.http.post(self.url("/api/leads/refresh")))
    }

    pub fn model_status(&self) -> Result<ModelStatus, ClientError> {
        self.fetch(self.http.get(self.url("/api/model")))
    }

    pub fn reload_model(&self) -> Result<ModelStatus, ClientError> {
        self.fetch(self.http.post(self.url("/api/model/reload")))
    }

    pub fn predict(&self, features: &HashMap<String, String>) -> Result<Prediction, ClientError> {
        self.fetch(
            self.http
                .post(self.url("/api/predict"))
                .json(&json!({ "features": features })),
        )
    }

    pub fn chat_status(&self) -> Result<ChatStatus, ClientError> {
        self.fetch(self.http.get(self.url("/api/chat/status")))
    }

    pub fn create_session(&self) -> Result<String, ClientError> {
        let created: SessionCreated = self.fetch(self.http.post(self.url("/api/chat/sessions")))?;
        Ok(created.session_id)
    }

    pub fn send_chat(&self, session_id: &str, message: &str) -> Result<ChatReply, ClientError> {
        self.fetch(
            self.http
                .post(self.url("/api/chat"))
                .json(&json!({ "session_id": session_id, "message": message })),
        )
    }

    pub fn reset_chat(&self, session_id: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/api/chat/sessions/{}", session_id)))
            .send()?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::api_error(response))
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send()?;
        if !response.status().is_success() {
            return Err(Self::api_error(response));
        }
        Ok(response.json()?)
    }

    fn api_error(response: reqwest::blocking::Response) -> ClientError {
        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or_else(|_| format!("Backend returned status {}: {}", status, body));
        ClientError::Api { status, message }
    }
}
