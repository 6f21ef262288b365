//! Error types for the chat service
//!
//! Cache operations never fail; these errors come from the Store and from
//! request validation, and pass through the cache layer unchanged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::pagination::CursorError;

// == App Error Enum ==
/// Unified error type for the service and its HTTP surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Referenced user, session, or message does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data, including malformed cursors
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<CursorError> for AppError {
    fn from(err: CursorError) -> Self {
        AppError::InvalidRequest(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the chat service.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        let cases = [
            (AppError::NotFound("user".into()), StatusCode::NOT_FOUND),
            (AppError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn cursor_errors_are_bad_requests() {
        let err: AppError = CursorError::Invalid("zzz".into()).into();
        assert_eq!(err, AppError::InvalidRequest("invalid cursor: zzz".into()));
    }
}
