//! API error taxonomy and its HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to HTTP clients as `{"error": ...}` bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required top-level submission field is absent.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// The body parsed as JSON but does not match the submission schema.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// The collection is empty.
    #[error("No data available")]
    NoData,

    /// The requested file does not exist in the data directory.
    #[error("File not found")]
    FileNotFound,

    /// Anything else that went wrong while handling the request.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingField(_) | Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::NoData | Self::FileNotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            // Include the full context chain for unexpected failures.
            Self::Internal(err) => format!("{err:#}"),
            other => other.to_string(),
        };
        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}
