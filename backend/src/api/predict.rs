//! Role prediction API handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::AppError;
use crate::model::{FeatureRow, ModelAvailability, MODEL_UNAVAILABLE_MESSAGE};
use crate::state::SharedState;

/// Model status for the prediction tab
#[derive(Debug, Serialize)]
pub struct ModelStatusResponse {
    /// Whether a model is loaded
    pub available: bool,
    /// Columns the model was trained on
    pub feature_names: Vec<String>,
    /// Labels the model can predict
    pub classes: Vec<String>,
    /// Whether the table's feature columns match the model (None without data)
    pub schema_matches: Option<bool>,
    /// Explanation when the model is unavailable or the schema differs
    pub message: Option<String>,
}

/// Request to predict a primary role
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Feature column -> user-entered text; missing columns count as blank
    #[serde(default)]
    pub features: HashMap<String, String>,
}

/// Probability of one class
#[derive(Debug, Serialize)]
pub struct ClassProbability {
    /// Class label
    pub label: String,
    /// Probability in [0, 1]
    pub probability: f64,
}

/// Prediction result
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// Predicted primary role
    pub prediction: String,
    /// Per-class probabilities, highest first
    pub probabilities: Vec<ClassProbability>,
    /// Feature columns the input was built from
    pub feature_columns: Vec<String>,
}

async fn model_status(state: &SharedState, model: &ModelAvailability) -> ModelStatusResponse {
    let Some(pipeline) = model.pipeline() else {
        return ModelStatusResponse {
            available: false,
            feature_names: Vec::new(),
            classes: Vec::new(),
            schema_matches: None,
            message: Some(MODEL_UNAVAILABLE_MESSAGE.to_string()),
        };
    };

    let leads = state.leads.load().await;
    let (schema_matches, message) = if leads.frame.is_empty() {
        (None, None)
    } else {
        let columns = leads.frame.feature_columns();
        match pipeline.check_schema(columns.iter().map(String::as_str)) {
            Ok(()) => (Some(true), None),
            Err(e) => (Some(false), Some(e.to_string())),
        }
    };

    ModelStatusResponse {
        available: true,
        feature_names: pipeline.feature_names().to_vec(),
        classes: pipeline.classes().to_vec(),
        schema_matches,
        message,
    }
}

/// GET /api/model - Model availability and schema compatibility
pub async fn get_model_status(State(state): State<SharedState>) -> Json<ModelStatusResponse> {
    let model = state.model().await;
    Json(model_status(&state, &model).await)
}

/// POST /api/model/reload - Re-read the artifact from disk
pub async fn reload_model(State(state): State<SharedState>) -> Json<ModelStatusResponse> {
    tracing::info!(path = %state.config.model.path.display(), "Reloading model artifact");
    let model = state.reload_model().await;
    Json(model_status(&state, &model).await)
}

/// POST /api/predict - Predict a primary role from feature values
///
/// The input row is built from the table's feature columns; values not
/// supplied by the user are blank.
pub async fn predict(
    State(state): State<SharedState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, AppError> {
    let model = state.model().await;
    let pipeline = model.pipeline().ok_or(AppError::ModelUnavailable)?;

    let leads = state.leads.load().await;
    if leads.frame.is_empty() {
        return Err(AppError::NoData);
    }
    let feature_columns = leads.frame.feature_columns();

    let mut unknown: Vec<&String> = request
        .features
        .keys()
        .filter(|k| !feature_columns.contains(k))
        .collect();
    if !unknown.is_empty() {
        unknown.sort();
        let names: Vec<&str> = unknown.iter().map(|k| k.as_str()).collect();
        return Err(AppError::InvalidRequest(format!(
            "Unknown feature column(s): {}",
            names.join(", ")
        )));
    }

    let row: FeatureRow = feature_columns
        .iter()
        .map(|column| {
            let value = request.features.get(column).cloned().unwrap_or_default();
            (column.clone(), value)
        })
        .collect();

    let mut probabilities = pipeline.predict_proba(&row)?;
    let prediction = pipeline
        .predict(std::slice::from_ref(&row))?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Model returned no prediction")))?;

    probabilities.sort_by(|a, b| b.1.total_cmp(&a.1));

    tracing::info!(prediction = %prediction, "Predicted primary role");

    Ok(Json(PredictResponse {
        prediction,
        probabilities: probabilities
            .into_iter()
            .map(|(label, probability)| ClassProbability { label, probability })
            .collect(),
        feature_columns,
    }))
}
