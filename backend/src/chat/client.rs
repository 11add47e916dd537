//! Chat completion client
//!
//! `ChatCompletion` is the seam between the relay and the remote endpoint.
//! `GeminiChatClient` implements it with direct HTTP calls to the Gemini API.

use crate::chat::error::ChatError;
use crate::chat::gemini_types::{GeminiApiRequest, GeminiApiResponse, RequestContent, RequestPart};
use crate::chat::models::{MessageRole, TranscriptEntry};
use crate::config::ChatConfig;
use async_trait::async_trait;

/// Remote chat-completion endpoint
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Send the conversation (oldest first) and return the reply text
    async fn complete(&self, history: &[TranscriptEntry]) -> Result<String, ChatError>;
}

/// Gemini `generateContent` client
pub struct GeminiChatClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiChatClient {
    /// Create a client; `None` when no API key is configured
    pub fn from_config(http: reqwest::Client, config: &ChatConfig) -> Option<Self> {
        let api_key = config.api_key.as_deref()?.trim();
        if api_key.is_empty() {
            return None;
        }
        Some(Self {
            http,
            api_key: api_key.to_string(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_request(history: &[TranscriptEntry]) -> GeminiApiRequest {
        GeminiApiRequest {
            contents: history
                .iter()
                .map(|entry| RequestContent {
                    role: match entry.role {
                        MessageRole::User => "user".to_string(),
                        MessageRole::Assistant => "model".to_string(),
                    },
                    parts: vec![RequestPart {
                        text: entry.content.clone(),
                    }],
                })
                .collect(),
        }
    }
}

#[async_trait]
impl ChatCompletion for GeminiChatClient {
    async fn complete(&self, history: &[TranscriptEntry]) -> Result<String, ChatError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request_body = Self::build_request(history);

        tracing::debug!(
            model = %self.model,
            turns = history.len(),
            "Calling Gemini API"
        );

        // Shared client (connection pooling); the key never goes in the URL
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::error!(
                status_code = status_code,
                error_body = %error_body,
                "Gemini API returned error status"
            );

            if status_code == 429 {
                return Err(ChatError::RateLimited(error_body));
            }
            return Err(ChatError::Status {
                status: status_code,
                body: error_body,
            });
        }

        let response_body = response.text().await?;
        let parsed: GeminiApiResponse = serde_json::from_str(&response_body)
            .map_err(|e| ChatError::Decode(format!("{} - Response body: {}", e, response_body)))?;

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_ref())
        {
            return Err(ChatError::Blocked(reason.clone()));
        }

        let text: String = parsed
            .candidates
            .first()
            .map(|c| c.content.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ChatError::EmptyReply);
        }

        tracing::debug!(response_len = text.len(), "Received reply from Gemini API");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client_for(server: &Server) -> GeminiChatClient {
        let config = ChatConfig {
            api_key: Some("test-key".to_string()),
            model: "gemini-2.5-flash".to_string(),
            base_url: server.url(),
            history_limit: 40,
            session_idle_secs: 3600,
        };
        GeminiChatClient::from_config(reqwest::Client::new(), &config).unwrap()
    }

    fn history() -> Vec<TranscriptEntry> {
        vec![
            TranscriptEntry::user("Who are our leads?"),
            TranscriptEntry::assistant("Mostly engineers."),
            TranscriptEntry::user("And in sales?"),
        ]
    }

    #[test]
    fn test_disabled_without_key() {
        let mut config = ChatConfig {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            base_url: "http://localhost".to_string(),
            history_limit: 40,
            session_idle_secs: 3600,
        };
        assert!(GeminiChatClient::from_config(reqwest::Client::new(), &config).is_none());

        config.api_key = Some("  ".to_string());
        assert!(GeminiChatClient::from_config(reqwest::Client::new(), &config).is_none());
    }

    #[test]
    fn test_assistant_maps_to_model_role() {
        let request = GeminiChatClient::build_request(&history());
        let roles: Vec<&str> = request.contents.iter().map(|c| c.role.as_str()).collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
    }

    #[tokio::test]
    async fn test_complete_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "Who are our leads?"}]},
                    {"role": "model", "parts": [{"text": "Mostly engineers."}]},
                    {"role": "user", "parts": [{"text": "And in sales?"}]}
                ]
            })))
            .with_status(200)
            .with_body(
                r#"{
                    "candidates": [{
                        "content": {
                            "parts": [{"text": "Two account executives."}],
                            "role": "model"
                        },
                        "finishReason": "STOP"
                    }]
                }"#,
            )
            .create_async()
            .await;

        let reply = client_for(&server).complete(&history()).await;

        mock.assert_async().await;
        assert_eq!(reply.unwrap(), "Two account executives.");
    }

    #[tokio::test]
    async fn test_complete_blocked_prompt() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .with_status(200)
            .with_body(r#"{"candidates": [], "promptFeedback": {"blockReason": "SAFETY"}}"#)
            .create_async()
            .await;

        let result = client_for(&server).complete(&history()).await;

        mock.assert_async().await;
        assert_eq!(result, Err(ChatError::Blocked("SAFETY".to_string())));
    }

    #[tokio::test]
    async fn test_complete_rate_limit() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .with_status(429)
            .with_body(r#"{"error": "Rate limit exceeded"}"#)
            .create_async()
            .await;

        let result = client_for(&server).complete(&history()).await;

        mock.assert_async().await;
        let error_msg = result.unwrap_err().to_string();
        assert!(error_msg.contains("rate limit") && error_msg.contains("429"));
    }

    #[tokio::test]
    async fn test_complete_empty_candidates() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .with_status(200)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let result = client_for(&server).complete(&history()).await;

        mock.assert_async().await;
        assert_eq!(result, Err(ChatError::EmptyReply));
    }

    #[tokio::test]
    async fn test_complete_invalid_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .with_status(200)
            .with_body("This is not JSON")
            .create_async()
            .await;

        let result = client_for(&server).complete(&history()).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ChatError::Decode(_))));
    }

    #[tokio::test]
    async fn test_transport_error_hides_api_key() {
        // Nothing listens on port 9
        let config = ChatConfig {
            api_key: Some("sekrit-gemini-key".to_string()),
            model: "gemini-2.5-flash".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            history_limit: 40,
            session_idle_secs: 3600,
        };
        let client = GeminiChatClient::from_config(reqwest::Client::new(), &config).unwrap();

        let err = client.complete(&history()).await.unwrap_err();

        assert!(matches!(err, ChatError::Request(_)));
        assert!(!err.to_string().contains("sekrit-gemini-key"));
        let app_error = crate::error::AppError::from(err);
        assert!(!app_error.to_string().contains("sekrit-gemini-key"));
    }
}
