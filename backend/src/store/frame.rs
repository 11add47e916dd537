//! Tabular view over the rows returned by the table store
//!
//! Rows are schema-less: every row is an ordered map from column name to a
//! JSON value, and the frame's column list is discovered from the rows.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Target column predicted by the classifier
pub const TARGET_COLUMN: &str = "primary_role";

/// Columns never used as classifier input
pub const EXCLUDED_COLUMNS: [&str; 3] = [TARGET_COLUMN, "lead_id", "full_name"];

/// A single lead record (column name -> value, in store order)
pub type LeadRow = Map<String, Value>;

/// All rows of the leads table plus the discovered column order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LeadsFrame {
    columns: Vec<String>,
    rows: Vec<LeadRow>,
}

impl LeadsFrame {
    /// Build a frame from rows as returned by the store
    ///
    /// Column order is the order of first appearance: the first row's keys,
    /// then any keys introduced by later rows.
    pub fn from_rows(rows: Vec<LeadRow>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, rows }
    }

    /// Frame with no rows and no columns
    pub fn empty() -> Self {
        Self::default()
    }

    /// Column names in display order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows
    pub fn rows(&self) -> &[LeadRow] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table returned no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether a column was discovered
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Columns usable as classifier input, in frame order
    pub fn feature_columns(&self) -> Vec<String> {
        feature_columns(&self.columns)
    }

    /// Distinct values of `column` with their counts
    ///
    /// Sorted by count (descending); ties keep first-seen order. Rows where
    /// the column is missing or null are not counted.
    pub fn value_counts(&self, column: &str) -> Vec<(String, usize)> {
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();

        for row in &self.rows {
            let value = match row.get(column) {
                None | Some(Value::Null) => continue,
                Some(v) => cell_text(v),
            };
            let count = counts.entry(value.clone()).or_insert(0);
            if *count == 0 {
                order.push(value);
            }
            *count += 1;
        }

        let mut result: Vec<(String, usize)> = order
            .into_iter()
            .map(|value| {
                let count = counts[&value];
                (value, count)
            })
            .collect();
        // sort_by is stable, so ties stay in first-seen order
        result.sort_by(|a, b| b.1.cmp(&a.1));
        result
    }
}

/// Drop the reserved target/identifier columns, keeping order
pub fn feature_columns(columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .filter(|c| !EXCLUDED_COLUMNS.contains(&c.as_str()))
        .cloned()
        .collect()
}

/// Display text for a single cell
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(value: Value) -> Vec<LeadRow> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_single_row_feature_columns() {
        let frame = LeadsFrame::from_rows(rows(json!([
            {"lead_id": 1, "full_name": "A", "primary_role": "Eng", "age": "30"}
        ])));

        assert_eq!(frame.len(), 1);
        assert_eq!(
            frame.columns(),
            &["lead_id", "full_name", "primary_role", "age"]
        );
        assert_eq!(frame.feature_columns(), vec!["age".to_string()]);
    }

    #[test]
    fn test_feature_columns_deterministic() {
        let columns: Vec<String> = [
            "company",
            "lead_id",
            "age",
            "full_name",
            "primary_role",
            "seniority",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let first = feature_columns(&columns);
        let second = feature_columns(&columns);
        assert_eq!(first, vec!["company", "age", "seniority"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_columns_union_in_first_seen_order() {
        let frame = LeadsFrame::from_rows(rows(json!([
            {"lead_id": 1, "age": "30"},
            {"lead_id": 2, "company": "Acme", "age": "41"}
        ])));
        assert_eq!(frame.columns(), &["lead_id", "age", "company"]);
        assert!(frame.has_column("company"));
        assert!(!frame.has_column("primary_role"));
    }

    #[test]
    fn test_empty_frame() {
        let frame = LeadsFrame::from_rows(Vec::new());
        assert!(frame.is_empty());
        assert!(frame.columns().is_empty());
        assert!(frame.feature_columns().is_empty());
        assert_eq!(frame, LeadsFrame::empty());
    }

    #[test]
    fn test_value_counts_sorted_with_stable_ties() {
        let frame = LeadsFrame::from_rows(rows(json!([
            {"primary_role": "Sales"},
            {"primary_role": "Eng"},
            {"primary_role": "Eng"},
            {"primary_role": "Ops"},
            {"primary_role": null},
            {"age": 3}
        ])));

        assert_eq!(
            frame.value_counts(TARGET_COLUMN),
            vec![
                ("Eng".to_string(), 2),
                ("Sales".to_string(), 1),
                ("Ops".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&json!("Eng")), "Eng");
        assert_eq!(cell_text(&json!(42)), "42");
        assert_eq!(cell_text(&json!(true)), "true");
        assert_eq!(cell_text(&Value::Null), "");
    }
}
