// Background request worker
// Each request runs on its own thread; results come back over a channel and
// are drained by the UI once per frame.

use super::{BackendClient, ChatReply, ChatStatus, ClientError, LeadsData, ModelStatus, Prediction};
use eframe::egui;
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

/// A user action that needs the backend
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    LoadLeads,
    RefreshLeads,
    LoadModelStatus,
    ReloadModel,
    Predict(HashMap<String, String>),
    LoadChatStatus,
    /// Send a message; a session is created first when `session_id` is None
    SendChat {
        session_id: Option<String>,
        message: String,
    },
    ResetChat {
        session_id: String,
    },
}

/// Result of a `Request`
#[derive(Debug)]
pub enum Response {
    Leads(Result<LeadsData, ClientError>),
    ModelStatus(Result<ModelStatus, ClientError>),
    Prediction(Result<Prediction, ClientError>),
    ChatStatus(Result<ChatStatus, ClientError>),
    /// `session_id` is reported even when the send itself failed
    Chat {
        session_id: Option<String>,
        result: Result<ChatReply, ClientError>,
    },
    ChatReset(Result<(), ClientError>),
}

pub struct Worker {
    client: Arc<BackendClient>,
    tx: Sender<Response>,
    rx: Receiver<Response>,
    repaint: Option<egui::Context>,
}

impl Worker {
    /// `repaint` is poked when a response arrives so the UI wakes up
    pub fn new(client: BackendClient, repaint: Option<egui::Context>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            client: Arc::new(client),
            tx,
            rx,
            repaint,
        }
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    /// Run `request` in the background
    pub fn submit(&self, request: Request) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let repaint = self.repaint.clone();
        thread::spawn(move || {
            let response = execute(&client, request);
            // Receiver gone means the app is shutting down
            let _ = tx.send(response);
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }

    /// Responses that arrived since the last poll
    pub fn poll(&self) -> Vec<Response> {
        self.rx.try_iter().collect()
    }
}

/// Perform one request synchronously
pub fn execute(client: &BackendClient, request: Request) -> Response {
    match request {
        Request::LoadLeads => Response::Leads(client.leads()),
        Request::RefreshLeads => Response::Leads(client.refresh_leads()),
        Request::LoadModelStatus => Response::ModelStatus(client.model_status()),
        Request::ReloadModel => Response::ModelStatus(client.reload_model()),
        Request::Predict(features) => Response::Prediction(client.predict(&features)),
        Request::LoadChatStatus => Response::ChatStatus(client.chat_status()),
        Request::SendChat {
            session_id,
            message,
        } => {
            let session_id = match session_id {
                Some(id) => id,
                None => match client.create_session() {
                    Ok(id) => id,
                    Err(e) => {
                        return Response::Chat {
                            session_id: None,
                            result: Err(e),
                        }
                    }
                },
            };
            let result = client.send_chat(&session_id, &message);
            Response::Chat {
                session_id: Some(session_id),
                result,
            }
        }
        Request::ResetChat { session_id } => Response::ChatReset(client.reset_chat(&session_id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use std::time::{Duration, Instant};

    #[test]
    fn test_send_without_session_creates_one() {
        let mut server = Server::new();
        let _create = server
            .mock("POST", "/api/chat/sessions")
            .with_status(201)
            .with_body(r#"{"session_id": "abc"}"#)
            .create();
        let _send = server
            .mock("POST", "/api/chat")
            .match_body(Matcher::PartialJsonString(
                r#"{"session_id": "abc", "message": "hi"}"#.to_string(),
            ))
            .with_status(200)
            .with_body(
                r#"{"session_id": "abc", "reply": "hello", "ignored": false,
                    "transcript": [{"role": "user", "content": "hi"},
                                   {"role": "assistant", "content": "hello"}]}"#,
            )
            .create();
        let client = BackendClient::new(server.url()).unwrap();

        let response = execute(
            &client,
            Request::SendChat {
                session_id: None,
                message: "hi".to_string(),
            },
        );

        match response {
            Response::Chat { session_id, result } => {
                assert_eq!(session_id.as_deref(), Some("abc"));
                let reply = result.unwrap();
                assert_eq!(reply.reply.as_deref(), Some("hello"));
                assert_eq!(reply.transcript.len(), 2);
            }
            other => panic!("Expected chat response, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_send_still_reports_session() {
        let mut server = Server::new();
        let _send = server
            .mock("POST", "/api/chat")
            .with_status(502)
            .with_body(r#"{"error": "Chat API returned error status 500: boom", "status": 502}"#)
            .create();
        let client = BackendClient::new(server.url()).unwrap();

        let response = execute(
            &client,
            Request::SendChat {
                session_id: Some("abc".to_string()),
                message: "hi".to_string(),
            },
        );

        match response {
            Response::Chat { session_id, result } => {
                assert_eq!(session_id.as_deref(), Some("abc"));
                let error = result.unwrap_err();
                assert!(error.to_string().contains("boom"));
            }
            other => panic!("Expected chat response, got {:?}", other),
        }
    }

    #[test]
    fn test_non_json_error_body() {
        let mut server = Server::new();
        let _model = server
            .mock("GET", "/api/model")
            .with_status(500)
            .with_body("oops")
            .create();
        let client = BackendClient::new(server.url()).unwrap();

        match execute(&client, Request::LoadModelStatus) {
            Response::ModelStatus(Err(ClientError::Api { status, message })) => {
                assert_eq!(status, 500);
                assert!(message.contains("oops"));
            }
            other => panic!("Expected API error, got {:?}", other),
        }
    }

    #[test]
    fn test_worker_delivers_responses() {
        let mut server = Server::new();
        let _leads = server
            .mock("GET", "/api/leads")
            .with_status(200)
            .with_body(
                r#"{"total": 0, "columns": [], "rows": [], "feature_columns": [],
                    "role_distribution": [], "notice": "No data available or failed to load."}"#,
            )
            .create();
        let worker = Worker::new(BackendClient::new(server.url()).unwrap(), None);

        worker.submit(Request::LoadLeads);

        let deadline = Instant::now() + Duration::from_secs(10);
        let mut responses = Vec::new();
        while responses.is_empty() && Instant::now() < deadline {
            responses = worker.poll();
            std::thread::sleep(Duration::from_millis(10));
        }

        match responses.pop() {
            Some(Response::Leads(Ok(data))) => {
                assert_eq!(data.total, 0);
                assert!(data.notice.is_some());
            }
            other => panic!("Expected leads response, got {:?}", other),
        }
    }
}
