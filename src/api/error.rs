//! API error types with JSON responses.
//!
//! The wire shape is a flat `{"error": "message"}` object. Extraction
//! failures are the caller's problem (400); analysis failures are ours or
//! the upstream model's (500), and their detail is surfaced in the body to
//! make pipeline failures diagnosable from the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::pipeline::analysis::AnalysisError;
use crate::pipeline::extraction::ExtractionError;

/// Flat error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail.clone()),
            ApiError::Extraction(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Analysis(e) => {
                tracing::error!(error = %e, "Analysis pipeline failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
