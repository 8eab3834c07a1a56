//! Error handling for the Tripcast weather service
//!
//! `AppError` is the only error that reaches HTTP callers. Fetcher and cache
//! errors are absorbed into `null` days before a response is built.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Failures inside a single source fetcher
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("API key for {0} is not configured")]
    MissingApiKey(&'static str),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("failed to decode upstream response: {0}")]
    Decode(String),

    #[error("no location found for ({latitude}, {longitude})")]
    LocationNotFound { latitude: f64, longitude: f64 },

    #[error("no entry for {0} in upstream response")]
    DateNotFound(chrono::NaiveDate),

    #[error("upstream entry is missing {0}")]
    IncompleteData(&'static str),
}

/// Failures of the cache store collaborator
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache store unreachable: {0}")]
    Unreachable(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "BAD_REQUEST".to_string(),
                    message: msg.clone(),
                },
            ),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorDetail {
                    code: "METHOD_NOT_ALLOWED".to_string(),
                    message: "Only POST is supported on this endpoint".to_string(),
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message: format!("Configuration error: {}", msg),
                },
            ),
        };

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!("Rejected request: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
