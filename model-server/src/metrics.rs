//! Prometheus metrics for model server observability
//!
//! Exposes metrics at /metrics endpoint for scraping by Prometheus.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use std::time::Duration;

/// Global Prometheus handle
static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Metric names
pub const PREDICT_REQUESTS: &str = "model_server_predict_requests_total";
pub const ROWS_SCORED: &str = "model_server_rows_scored_total";
pub const PREDICT_FALLBACKS: &str = "model_server_predict_fallbacks_total";
pub const CONFIDENCE_FAILURES: &str = "model_server_confidence_failures_total";
pub const PREDICT_LATENCY: &str = "model_server_predict_latency_seconds";
pub const MODEL_LOADED: &str = "model_server_model_loaded";

/// Initialize the metrics system
pub fn init_metrics() -> Result<(), BuildError> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }
    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = METRICS_HANDLE.set(handle);

    // Describe metrics for Prometheus
    describe_counter!(PREDICT_REQUESTS, "Prediction requests by outcome");
    describe_counter!(ROWS_SCORED, "Rows scored by successful predictions");
    describe_counter!(
        PREDICT_FALLBACKS,
        "Predictions served by the raw-value retry"
    );
    describe_counter!(
        CONFIDENCE_FAILURES,
        "Responses whose confidence computation failed"
    );
    describe_histogram!(PREDICT_LATENCY, "Model inference latency in seconds");
    describe_gauge!(MODEL_LOADED, "1 when a model is loaded, 0 otherwise");

    tracing::info!("Metrics system initialized");
    Ok(())
}

/// Handler for /metrics endpoint
pub async fn metrics_handler() -> String {
    METRICS_HANDLE
        .get()
        .map(PrometheusHandle::render)
        .unwrap_or_default()
}

// ============================================================================
// Model Metrics
// ============================================================================

pub fn set_model_loaded(loaded: bool) {
    gauge!(MODEL_LOADED).set(if loaded { 1.0 } else { 0.0 });
}

// ============================================================================
// Prediction Metrics
// ============================================================================

/// Record a finished prediction request
pub fn record_predict_request(outcome: &'static str) {
    counter!(PREDICT_REQUESTS, "outcome" => outcome).increment(1);
}

/// Record rows scored by a successful request
pub fn record_rows_scored(rows: usize) {
    counter!(ROWS_SCORED).increment(rows as u64);
}

/// Record a request answered by the raw-value retry
pub fn record_fallback() {
    counter!(PREDICT_FALLBACKS).increment(1);
}

/// Record a request whose confidences were dropped
pub fn record_confidence_failure() {
    counter!(CONFIDENCE_FAILURES).increment(1);
}

/// Record inference latency
pub fn record_predict_latency(duration: Duration) {
    histogram!(PREDICT_LATENCY).record(duration.as_secs_f64());
}
