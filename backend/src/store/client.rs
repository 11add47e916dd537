//! Table store client
//!
//! Thin HTTP client for a PostgREST-style table store (the REST interface
//! Supabase exposes under `/rest/v1`).

use crate::config::StoreConfig;
use crate::store::error::StoreError;
use crate::store::frame::{LeadRow, LeadsFrame};

/// Credentials for the table store
#[derive(Clone)]
pub struct StoreCredentials {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Anon or service key
    pub key: String,
}

impl StoreCredentials {
    /// Build credentials, rejecting blank values
    pub fn new(url: Option<&str>, key: Option<&str>) -> Result<Self, StoreError> {
        let url = url.map(str::trim).filter(|u| !u.is_empty());
        let key = key.map(str::trim).filter(|k| !k.is_empty());
        match (url, key) {
            (Some(url), Some(key)) => Ok(Self {
                url: url.trim_end_matches('/').to_string(),
                key: key.to_string(),
            }),
            _ => Err(StoreError::MissingCredentials),
        }
    }

    /// Credentials from loaded store settings
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        Self::new(config.url.as_deref(), config.key.as_deref())
    }

    /// Credentials from `SUPABASE_URL` and `SUPABASE_ANON_KEY`/`SUPABASE_KEY`
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_config(&StoreConfig::from_env())
    }
}

impl std::fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("url", &self.url)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Client handle for the table store
#[derive(Debug, Clone)]
pub struct TableStoreClient {
    http: reqwest::Client,
    credentials: StoreCredentials,
}

impl TableStoreClient {
    /// Create a client from credentials and a shared HTTP client
    pub fn new(http: reqwest::Client, credentials: StoreCredentials) -> Self {
        Self { http, credentials }
    }

    /// Base URL the client talks to
    pub fn url(&self) -> &str {
        &self.credentials.url
    }

    /// Fetch every row of `table` (`select=*`)
    ///
    /// No pagination, filtering or ordering is applied and nothing is retried.
    pub async fn fetch_table(&self, table: &str) -> Result<LeadsFrame, StoreError> {
        let url = format!("{}/rest/v1/{}", self.credentials.url, table);

        tracing::debug!(url = %url, table = %table, "Fetching table from store");

        let response = self
            .http
            .get(&url)
            .query(&[("select", "*")])
            .header("apikey", &self.credentials.key)
            .bearer_auth(&self.credentials.key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            tracing::error!(
                status_code = status.as_u16(),
                error_body = %body,
                table = %table,
                "Table store returned error status"
            );
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let rows: Vec<LeadRow> =
            serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))?;

        tracing::debug!(table = %table, rows = rows.len(), "Fetched table from store");

        Ok(LeadsFrame::from_rows(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client_for(server: &Server) -> TableStoreClient {
        let credentials = StoreCredentials::new(Some(&server.url()), Some("test-key")).unwrap();
        TableStoreClient::new(reqwest::Client::new(), credentials)
    }

    #[test]
    fn test_credentials_reject_blank() {
        assert!(matches!(
            StoreCredentials::new(None, Some("key")),
            Err(StoreError::MissingCredentials)
        ));
        assert!(matches!(
            StoreCredentials::new(Some("https://x.supabase.co"), Some("  ")),
            Err(StoreError::MissingCredentials)
        ));
        let creds = StoreCredentials::new(Some("https://x.supabase.co/"), Some("k")).unwrap();
        assert_eq!(creds.url, "https://x.supabase.co");
    }

    #[tokio::test]
    async fn test_fetch_table_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/leads")
            .match_query(Matcher::UrlEncoded("select".into(), "*".into()))
            .match_header("apikey", "test-key")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_body(
                r#"[
                    {"lead_id": 1, "full_name": "A", "primary_role": "Eng", "age": "30"},
                    {"lead_id": 2, "full_name": "B", "primary_role": "Sales", "age": "45"}
                ]"#,
            )
            .create_async()
            .await;

        let frame = client_for(&server).fetch_table("leads").await.unwrap();

        mock.assert_async().await;
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.feature_columns(), vec!["age".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_table_error_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/leads")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"message": "Invalid API key"}"#)
            .create_async()
            .await;

        let result = client_for(&server).fetch_table("leads").await;

        mock.assert_async().await;
        match result {
            Err(StoreError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert!(body.contains("Invalid API key"));
            }
            other => panic!("Expected Status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_table_not_an_array() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/leads")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"rows": []}"#)
            .create_async()
            .await;

        let result = client_for(&server).fetch_table("leads").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(StoreError::Decode(_))));
    }
}
