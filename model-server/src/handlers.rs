//! HTTP handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use serving_core::Table;
use tracing::{debug, error, info};

use crate::error::ApiError;
use crate::inference::{predict_table, PredictionEntry};
use crate::loader::LoadDiagnostics;
use crate::metrics;
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    model_loaded: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model_loaded: state.is_model_loaded(),
    })
}

/// Outcome of the startup model load
pub async fn model_info_handler(State(state): State<Arc<AppState>>) -> Json<LoadDiagnostics> {
    Json(state.diagnostics.clone())
}

/// Score a batch of row-objects
pub async fn predict_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vec<PredictionEntry>>, ApiError> {
    let result = predict(&state, body).await;
    match &result {
        Ok(Json(entries)) => {
            metrics::record_predict_request("ok");
            metrics::record_rows_scored(entries.len());
        }
        Err(e) => {
            metrics::record_predict_request(e.outcome());
            if matches!(e, ApiError::PredictionFailed { .. } | ApiError::Internal(_)) {
                error!(error = %e, "Prediction failed");
            } else {
                debug!(error = %e, "Prediction request rejected");
            }
        }
    }
    result
}

async fn predict(
    state: &AppState,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vec<PredictionEntry>>, ApiError> {
    let model = state.model.clone().ok_or(ApiError::ModelUnavailable)?;

    let Json(body) = body.map_err(|rejection| {
        debug!(error = %rejection, "Request body is not JSON");
        ApiError::MalformedBody
    })?;
    let rows = parse_rows(body)?;
    let table = Table::from_rows(&rows)?;

    let started = Instant::now();
    let prediction = tokio::task::spawn_blocking(move || predict_table(model.as_ref(), &table))
        .await
        .map_err(|e| ApiError::Internal(format!("Inference task failed: {e}")))??;
    metrics::record_predict_latency(started.elapsed());

    if prediction.used_fallback {
        metrics::record_fallback();
        info!("Prediction served by raw-value retry");
    }
    if prediction.confidence_failed {
        metrics::record_confidence_failure();
    }

    Ok(Json(prediction.entries))
}

/// Accept only a non-empty array whose elements are all objects.
fn parse_rows(body: Value) -> Result<Vec<Map<String, Value>>, ApiError> {
    let Value::Array(items) = body else {
        return Err(ApiError::MalformedBody);
    };
    if items.is_empty() {
        return Err(ApiError::MalformedBody);
    }
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(row) => Ok(row),
            _ => Err(ApiError::MalformedBody),
        })
        .collect()
}
