//! Error handling for the REST API server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use memento_core::MemoryError;

use crate::auth::AuthError;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    // Common error constructors
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn unauthenticated() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "UNAUTHENTICATED",
            "A valid session is required",
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "UNKNOWN", message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

// Status mapping for the memory service taxonomy. Domain codes travel
// to the client verbatim; only the status is a transport concern.
impl From<MemoryError> for ApiError {
    fn from(err: MemoryError) -> Self {
        let status = match err {
            MemoryError::ContentRequired | MemoryError::QueryRequired => StatusCode::BAD_REQUEST,
            MemoryError::NotAuthorized { .. } => StatusCode::FORBIDDEN,
            MemoryError::NoMemories
            | MemoryError::PageOutOfRange { .. }
            | MemoryError::OwnerRequired
            | MemoryError::MemoryNotFound { .. } => StatusCode::NOT_FOUND,
            MemoryError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, err.code(), err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = match err {
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, err.code(), err.to_string())
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_error_status_mapping() {
        let cases = [
            (MemoryError::ContentRequired, StatusCode::BAD_REQUEST),
            (MemoryError::QueryRequired, StatusCode::BAD_REQUEST),
            (MemoryError::OwnerRequired, StatusCode::NOT_FOUND),
            (MemoryError::NoMemories, StatusCode::NOT_FOUND),
            (
                MemoryError::not_found("m1"),
                StatusCode::NOT_FOUND,
            ),
            (
                MemoryError::not_authorized("m1"),
                StatusCode::FORBIDDEN,
            ),
            (
                MemoryError::Unknown("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            let code = err.code();
            let api: ApiError = err.into();
            assert_eq!(api.status, status);
            assert_eq!(api.code, code);
        }
    }
}
