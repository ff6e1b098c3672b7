//! Unified error handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::store::StoreError;

/// Message returned for bodies that are not a non-empty JSON array.
pub const NON_EMPTY_ARRAY: &str = "Request body must be a non-empty array";

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    BadRequest(String),
}

impl From<answerbook_engine::Error> for AppError {
    fn from(err: answerbook_engine::Error) -> Self {
        use answerbook_engine::Error;

        match err {
            Error::NotAnArray | Error::EmptyBatch => AppError::BadRequest(NON_EMPTY_ARRAY.into()),
            Error::InvalidRecord { index, reason } => {
                AppError::BadRequest(format!("Invalid record at index {}: {}", index, reason))
            }
            Error::InvalidContent(msg) => AppError::Store(StoreError::Malformed(msg)),
        }
    }
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Store(StoreError::Unavailable(msg)) => {
                tracing::error!("Store unavailable: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Store(StoreError::Malformed(msg)) => {
                tracing::error!("Malformed store: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::BadRequest(msg) => {
                tracing::warn!("Rejected request: {}", msg);
                StatusCode::BAD_REQUEST
            }
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;
