use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::DomainError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "bad_request",
            message: message.into(),
        }
    }
}

/// HTTP status for each domain failure.
pub fn status_for(err: &DomainError) -> (StatusCode, &'static str) {
    match err {
        DomainError::Extraction { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "extraction_failed"),
        DomainError::Precondition(_) => (StatusCode::CONFLICT, "documents_not_processed"),
        DomainError::Generation(_) => (StatusCode::BAD_GATEWAY, "generation_failed"),
        DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "bad_request"),
        DomainError::Configuration(_) | DomainError::Internal(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let (status, code) = status_for(&err);
        Self {
            status,
            code,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, message = %self.message, "request failed");
        }

        let body = ErrorBody {
            error: self.code.to_string(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
