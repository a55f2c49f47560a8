//! Error types for the token relay service.
//!
//! Uses `thiserror` for structured error handling with automatic `From`
//! implementations. Every error converts into the HTTP JSON error envelope
//! `{"success": false, "error": <message>}` via `IntoResponse`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors from the store and service layers.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// A required request field is missing or empty.
    #[error("{message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// No record with the given id exists.
    #[error("Token not found")]
    NotFound {
        /// The id that was looked up
        id: String,
    },

    /// Backend not initialized or not reachable.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Filesystem error from the flat-file backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key-value backend error.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// HTTP transport error from the paste backend.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error from the paste backend.
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),
}

impl StoreError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Create a not-found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// HTTP status code this error maps to.
    ///
    /// Validation and not-found get dedicated codes; everything else
    /// collapses to 500 with the raw error message in the envelope.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({
            "success": false,
            "error": self.to_string()
        }));
        (status, body).into_response()
    }
}

/// Result type alias for store and service operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            StoreError::validation("token", "Token is required").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(StoreError::not_found("123").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            StoreError::unavailable("redis down").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_message_is_user_facing() {
        let err = StoreError::validation("token", "Token is required");
        assert_eq!(err.to_string(), "Token is required");
    }

    #[test]
    fn test_not_found_message() {
        let err = StoreError::not_found("abc");
        assert_eq!(err.to_string(), "Token not found");
    }
}
