// Error types for croply-relay
// Author: kelexine (https://github.com/kelexine)

use crate::models::response::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("No image uploaded.")]
    NoImage,

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Upload exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Inference request failed: {status}")]
    Upstream { status: u16, body: String },

    #[error("Invalid inference response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Status code the caller sees for this error.
    ///
    /// Upstream failures map to 500; the remote status is only logged.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::NoImage | RelayError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            RelayError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Convert RelayError to the client envelope for Axum
impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            // Upload problems all look the same to the caller
            RelayError::NoImage | RelayError::InvalidUpload(_) => ErrorResponse::no_image(),
            RelayError::PayloadTooLarge { .. } => ErrorResponse::too_large(),
            other => ErrorResponse::internal(other.to_string()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
