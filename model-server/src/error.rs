//! Request-level errors and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned when `/predict` is called without a loaded model.
pub const MODEL_NOT_LOADED: &str = "Model not loaded";

/// Message returned when the body is not a non-empty array of objects.
pub const BAD_BODY_SHAPE: &str = "Request body must be a non-empty JSON array of objects";

/// Errors surfaced to `/predict` callers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{}", MODEL_NOT_LOADED)]
    ModelUnavailable,

    #[error("{}", BAD_BODY_SHAPE)]
    MalformedBody,

    #[error("Failed to parse input rows into table: {0}")]
    InvalidRows(#[from] serving_core::TableError),

    #[error("Model prediction failed: {named}; {positional}")]
    PredictionFailed { named: String, positional: String },

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::MalformedBody | Self::InvalidRows(_) => StatusCode::BAD_REQUEST,
            Self::PredictionFailed { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Label used for the outcome metric.
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::ModelUnavailable => "unavailable",
            Self::MalformedBody | Self::InvalidRows(_) => "bad_request",
            Self::PredictionFailed { .. } | Self::Internal(_) => "failed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
