//! Leads source: the boundary of the data access adapter
//!
//! Everything behind `LeadsSource::load` may fail; nothing in front of it
//! does. Failures become an empty frame plus a notice for the user.

use crate::cache::Memo;
use crate::config::StoreConfig;
use crate::store::client::{StoreCredentials, TableStoreClient};
use crate::store::error::StoreError;
use crate::store::frame::LeadsFrame;
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::sync::Arc;

/// Notice shown when the table loaded but had no rows, or failed to load
pub const NO_DATA_NOTICE: &str = "No data available or failed to load.";

/// Result of loading the leads table
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadedLeads {
    /// Rows, empty on any failure
    pub frame: LeadsFrame,
    /// Why the frame is empty, when it is because of a failure
    pub notice: Option<String>,
}

impl LoadedLeads {
    fn failed(error: &StoreError) -> Self {
        Self {
            frame: LeadsFrame::empty(),
            notice: Some(error.to_string()),
        }
    }
}

/// Cached access to the leads table
pub struct LeadsSource {
    http: reqwest::Client,
    config: StoreConfig,
    client: OnceCell<Option<TableStoreClient>>,
    cache: Memo<LoadedLeads>,
}

impl LeadsSource {
    /// Create a source; no network traffic happens until `load`
    pub fn new(http: reqwest::Client, config: StoreConfig) -> Self {
        let cache = Memo::new("leads", config.cache_ttl);
        Self {
            http,
            config,
            client: OnceCell::new(),
            cache,
        }
    }

    /// Table store client, built on first use
    ///
    /// `None` when credentials are missing; that outcome is memoized too.
    pub fn client(&self) -> Option<&TableStoreClient> {
        self.client
            .get_or_init(|| {
                match StoreCredentials::from_config(&self.config) {
                    Ok(credentials) => Some(TableStoreClient::new(self.http.clone(), credentials)),
                    Err(e) => {
                        tracing::warn!(error = %e, "Table store client unavailable");
                        None
                    }
                }
            })
            .as_ref()
    }

    /// Load the leads table, using the cached copy when present
    pub async fn load(&self) -> Arc<LoadedLeads> {
        self.cache.get_or_load(|| self.fetch()).await
    }

    /// Drop the cached table and fetch it again
    pub async fn refresh(&self) -> Arc<LoadedLeads> {
        self.cache.invalidate().await;
        self.load().await
    }

    async fn fetch(&self) -> LoadedLeads {
        let Some(client) = self.client() else {
            return LoadedLeads::failed(&StoreError::MissingCredentials);
        };

        match client.fetch_table(&self.config.table).await {
            Ok(frame) => {
                tracing::info!(
                    table = %self.config.table,
                    rows = frame.len(),
                    columns = frame.columns().len(),
                    "Loaded leads table"
                );
                LoadedLeads {
                    frame,
                    notice: None,
                }
            }
            Err(e) => {
                tracing::warn!(table = %self.config.table, error = %e, "Failed to load leads");
                LoadedLeads::failed(&e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn store_config(url: Option<String>, key: Option<&str>) -> StoreConfig {
        StoreConfig {
            url,
            key: key.map(str::to_string),
            table: "leads".to_string(),
            cache_ttl: None,
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_yield_empty_frame() {
        let configs = [
            store_config(None, None),
            store_config(Some("https://x.supabase.co".to_string()), None),
            store_config(None, Some("key")),
            store_config(Some(String::new()), Some("")),
        ];

        for config in configs {
            let source = LeadsSource::new(reqwest::Client::new(), config);
            let loaded = source.load().await;
            assert!(loaded.frame.is_empty());
            assert!(loaded
                .notice
                .as_deref()
                .unwrap()
                .contains("Supabase credentials are not set"));
            assert!(source.client().is_none());
        }
    }

    #[tokio::test]
    async fn test_unreachable_store_yields_empty_frame() {
        // Nothing listens on port 9 (discard); the connection is refused
        let config = store_config(Some("http://127.0.0.1:9".to_string()), Some("key"));
        let source = LeadsSource::new(reqwest::Client::new(), config);

        let loaded = source.load().await;
        assert!(loaded.frame.is_empty());
        assert!(loaded.notice.is_some());
    }

    #[tokio::test]
    async fn test_load_is_cached_until_refresh() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/leads")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"[{"lead_id": 1, "primary_role": "Eng", "age": "30"}]"#)
            .expect(2)
            .create_async()
            .await;

        let config = store_config(Some(server.url()), Some("key"));
        let source = LeadsSource::new(reqwest::Client::new(), config);

        let first = source.load().await;
        let second = source.load().await;
        assert_eq!(first.frame.len(), 1);
        assert!(Arc::ptr_eq(&first, &second));

        let refreshed = source.refresh().await;
        assert_eq!(refreshed.frame.len(), 1);
        assert!(!Arc::ptr_eq(&first, &refreshed));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_zero_rows_has_no_failure_notice() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/v1/leads")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let config = store_config(Some(server.url()), Some("key"));
        let source = LeadsSource::new(reqwest::Client::new(), config);

        let loaded = source.load().await;
        assert!(loaded.frame.is_empty());
        assert!(loaded.notice.is_none());
    }
}
