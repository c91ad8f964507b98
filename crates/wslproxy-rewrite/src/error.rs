//! Error types for body rewriting.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Result type alias for rewrite operations.
pub type Result<T> = std::result::Result<T, RewriteError>;

/// Errors that can occur while rewriting a Docker API body.
///
/// Path mapping itself never fails; only decoding, encoding and body
/// collection can.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// The body looked like JSON but could not be parsed.
    #[error("Invalid JSON body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The rewritten document could not be serialized.
    #[error("Failed to encode rewritten body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The HTTP body could not be collected.
    #[error("Failed to read body: {0}")]
    Body(String),
}

impl RewriteError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Decode(_) => StatusCode::BAD_REQUEST,
            Self::Encode(_) | Self::Body(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RewriteError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "message": self.to_string()
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_is_bad_request() {
        let err = serde_json::from_slice::<serde_json::Value>(b"{").unwrap_err();
        let err = RewriteError::Decode(err);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().starts_with("Invalid JSON body"));
    }

    #[test]
    fn body_error_is_internal() {
        let err = RewriteError::Body("connection reset".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to read body: connection reset");
    }
}
