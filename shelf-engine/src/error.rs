//! Error types for shelf-engine
//!
//! Ingestion has exactly four fatal outcomes. Enrichment failures are never
//! errors; they surface as a coverage fraction on the shelf instead.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Fatal ingestion outcome for one reader
#[derive(Debug, Error)]
pub enum IngestError {
    /// Identifier could not be resolved to a numeric reader id
    #[error("Invalid reader identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Feed unreachable by status, private, or not a shelf at all
    #[error("Profile {0} is private or does not exist")]
    ProfilePrivateOrInvalid(String),

    /// Feed parsed fine but the read shelf holds no books
    #[error("Reader {0} has no books on the read shelf")]
    EmptyShelf(String),

    /// Transient transport errors persisted past the retry budget
    #[error("Network failure after {attempts} attempt(s): {message}")]
    NetworkFailure { attempts: u32, message: String },

    /// shelf-common error (configuration, client construction)
    #[error("Common error: {0}")]
    Common(#[from] shelf_common::Error),
}

/// Result type for ingestion and the pipelines built on it
pub type IngestResult<T> = Result<T, IngestError>;

/// Transport-level failure of a single HTTP request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("unreadable response: {0}")]
    Body(String),
}

impl TransportError {
    /// Timeouts, connection errors, 429 and 5xx are worth another attempt
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::Timeout | TransportError::Connect(_) => true,
            TransportError::Status(code) => *code == 429 || *code >= 500,
            TransportError::Body(_) => false,
        }
    }

    /// Statuses that mean the shelf itself is not viewable
    pub fn is_access_denied(&self) -> bool {
        matches!(self, TransportError::Status(401 | 403 | 404))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if let Some(status) = err.status() {
            TransportError::Status(status.as_u16())
        } else if err.is_connect() || err.is_request() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Body(err.to_string())
        }
    }
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// shelf-common error
    #[error("Common error: {0}")]
    Common(#[from] shelf_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Common(shelf_common::Error::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg)
            }
            ApiError::Common(shelf_common::Error::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
            }
            ApiError::Common(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "COMMON_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(TransportError::Timeout.is_transient());
        assert!(TransportError::Connect("refused".into()).is_transient());
        assert!(TransportError::Status(429).is_transient());
        assert!(TransportError::Status(503).is_transient());
        assert!(!TransportError::Status(404).is_transient());
        assert!(!TransportError::Status(400).is_transient());
        assert!(!TransportError::Body("bad utf-8".into()).is_transient());
    }

    #[test]
    fn test_access_denied_statuses() {
        for code in [401, 403, 404] {
            assert!(TransportError::Status(code).is_access_denied());
        }
        assert!(!TransportError::Status(500).is_access_denied());
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = ApiError::NotFound("profile 1".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::Common(shelf_common::Error::NotFound("x".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
