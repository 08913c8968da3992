//! Errors returned by API handlers, rendered as plain text.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tally_core::{EnqueueError, InvalidRequest};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The body is not a valid calculation request.
    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(#[from] InvalidRequest),

    #[error("method not supported")]
    MethodNotAllowed,

    #[error(transparent)]
    Enqueue(#[from] EnqueueError),

    #[error("no results for ID {0}")]
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Decode(_) | ApiError::Invalid(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Enqueue(EnqueueError::QueueFull(req)) => {
                tracing::warn!(key = %req.key(), "Request queue full, rejecting submission");
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Enqueue(EnqueueError::Closed(req)) => {
                tracing::error!(key = %req.key(), "Request queue closed, rejecting submission");
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        (status, self.to_string()).into_response()
    }
}
