//! Gesture Model Server
//!
//! Serves a pre-trained classification model over HTTP:
//! - Loads one model artifact from disk at startup
//! - Scores JSON rows with an optional confidence per row
//! - Reports load diagnostics for operators
//!
//! Endpoints:
//! - POST /predict - Predict a label for each row-object in the body
//! - GET /health - Health check (includes whether a model is loaded)
//! - GET /model_info - Model load diagnostics
//! - GET /metrics - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod inference;
pub mod loader;
pub mod metrics;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;

/// Build the HTTP router around a fully loaded state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(handlers::predict_handler))
        .route("/health", get(handlers::health_handler))
        .route("/model_info", get(handlers::model_info_handler))
        .route("/metrics", get(metrics::metrics_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
