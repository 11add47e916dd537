//! Leads dashboard API handlers
//!
//! Serves the table, its feature columns and the primary-role distribution.
//! These handlers never fail: problems loading the table come back as an
//! empty table with a notice.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::SharedState;
use crate::store::{LeadRow, LoadedLeads, NO_DATA_NOTICE, TARGET_COLUMN};

/// One bar of the role distribution chart
#[derive(Debug, Serialize, PartialEq)]
pub struct RoleCount {
    /// Primary role value
    pub role: String,
    /// Number of leads with that role
    pub count: usize,
}

/// Leads dashboard payload
#[derive(Debug, Serialize)]
pub struct LeadsResponse {
    /// Number of rows
    pub total: usize,
    /// Column names in display order
    pub columns: Vec<String>,
    /// Rows as returned by the store
    pub rows: Vec<LeadRow>,
    /// Columns used as classifier input
    pub feature_columns: Vec<String>,
    /// `primary_role` value counts, empty when the column is absent
    pub role_distribution: Vec<RoleCount>,
    /// Why the table is empty, if it is
    pub notice: Option<String>,
}

impl From<&LoadedLeads> for LeadsResponse {
    fn from(loaded: &LoadedLeads) -> Self {
        let frame = &loaded.frame;
        let notice = match (&loaded.notice, frame.is_empty()) {
            (Some(notice), _) => Some(notice.clone()),
            (None, true) => Some(NO_DATA_NOTICE.to_string()),
            (None, false) => None,
        };
        let role_distribution = if frame.has_column(TARGET_COLUMN) {
            frame
                .value_counts(TARGET_COLUMN)
                .into_iter()
                .map(|(role, count)| RoleCount { role, count })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            total: frame.len(),
            columns: frame.columns().to_vec(),
            rows: frame.rows().to_vec(),
            feature_columns: frame.feature_columns(),
            role_distribution,
            notice,
        }
    }
}

/// GET /api/leads - Current (cached) leads table
pub async fn get_leads(State(state): State<SharedState>) -> Json<LeadsResponse> {
    let loaded = state.leads.load().await;
    Json(LeadsResponse::from(loaded.as_ref()))
}

/// POST /api/leads/refresh - Drop the cached table and fetch it again
pub async fn refresh_leads(State(state): State<SharedState>) -> Json<LeadsResponse> {
    tracing::info!("Refreshing leads table");
    let loaded = state.leads.refresh().await;
    Json(LeadsResponse::from(loaded.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LeadsFrame;
    use serde_json::json;

    fn loaded(rows: serde_json::Value) -> LoadedLeads {
        LoadedLeads {
            frame: LeadsFrame::from_rows(serde_json::from_value(rows).unwrap()),
            notice: None,
        }
    }

    #[test]
    fn test_single_lead_example() {
        let response = LeadsResponse::from(&loaded(json!([
            {"lead_id": 1, "full_name": "A", "primary_role": "Eng", "age": "30"}
        ])));

        assert_eq!(response.total, 1);
        assert_eq!(response.feature_columns, vec!["age"]);
        assert_eq!(
            response.role_distribution,
            vec![RoleCount {
                role: "Eng".to_string(),
                count: 1
            }]
        );
        assert!(response.notice.is_none());
    }

    #[test]
    fn test_zero_rows_reports_no_data() {
        let response = LeadsResponse::from(&loaded(json!([])));
        assert_eq!(response.total, 0);
        assert_eq!(response.notice.as_deref(), Some(NO_DATA_NOTICE));
    }

    #[test]
    fn test_failure_notice_wins() {
        let response = LeadsResponse::from(&LoadedLeads {
            frame: LeadsFrame::empty(),
            notice: Some("Table store returned error status 500: boom".to_string()),
        });
        assert!(response.notice.unwrap().contains("500"));
    }

    #[test]
    fn test_no_chart_without_target_column() {
        let response = LeadsResponse::from(&loaded(json!([{"lead_id": 1, "age": "30"}])));
        assert!(response.role_distribution.is_empty());
        assert_eq!(response.feature_columns, vec!["age"]);
    }
}
