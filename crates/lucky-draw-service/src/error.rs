//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use lucky_draw_core::DrawError;

/// Message shown for an unknown or malformed key.
pub const INVALID_KEY_MESSAGE: &str = "抽奖号无效";

/// Message shown for a key with no draws left.
pub const EXHAUSTED_KEY_MESSAGE: &str = "抽奖次数用尽";

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing or invalid admin key.
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden - required query parameters are missing.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input.
    #[error("{message}")]
    BadRequest {
        /// Machine-readable error code.
        code: &'static str,
        /// Message shown to the caller.
        message: String,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// A bad request with a machine-readable code.
    #[must_use]
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, error) = match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "unauthorized".to_string(),
            ),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            Self::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error, code })).into_response()
    }
}

impl From<DrawError> for ApiError {
    fn from(err: DrawError) -> Self {
        match err {
            DrawError::InvalidArgument(msg) => Self::bad_request("invalid_argument", msg),
            DrawError::InvalidKey { .. } | DrawError::InvalidKeyCode(_) => {
                Self::bad_request("invalid_key", INVALID_KEY_MESSAGE)
            }
            DrawError::ExhaustedKey { .. } => {
                Self::bad_request("exhausted_key", EXHAUSTED_KEY_MESSAGE)
            }
            DrawError::DuplicateKey { .. } => {
                Self::bad_request("duplicate_key", "Key already exists")
            }
            DrawError::Storage(msg) | DrawError::Configuration(msg) => Self::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_errors_are_bad_requests() {
        let invalid: ApiError = DrawError::InvalidKey { key: "1234".into() }.into();
        let exhausted: ApiError = DrawError::ExhaustedKey { key: "1234".into() }.into();

        assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(exhausted.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_and_exhausted_have_distinct_messages() {
        let invalid: ApiError = DrawError::InvalidKey { key: "1".into() }.into();
        let exhausted: ApiError = DrawError::ExhaustedKey { key: "1".into() }.into();
        assert_eq!(invalid.to_string(), INVALID_KEY_MESSAGE);
        assert_eq!(exhausted.to_string(), EXHAUSTED_KEY_MESSAGE);
    }

    #[test]
    fn storage_errors_are_opaque() {
        let err: ApiError = DrawError::Storage("disk on fire".into()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
