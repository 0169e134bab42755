// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for the venue service

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Network and Decode failures are recovered by the
/// synchronizer (offline path); the rest reach the caller.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum VenueError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Venue not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("A venue sync is already in progress")]
    SyncInProgress,
}

impl VenueError {
    /// True for failures that downgrade a sync to the cached venue list
    pub fn is_recoverable(&self) -> bool {
        matches!(self, VenueError::Network(_) | VenueError::Decode(_))
    }

    fn error_code(&self) -> &'static str {
        match self {
            VenueError::Network(_) => "NETWORK_ERROR",
            VenueError::Decode(_) => "DECODE_ERROR",
            VenueError::Persistence(_) => "PERSISTENCE_ERROR",
            VenueError::NotFound(_) => "NOT_FOUND",
            VenueError::InvalidInput(_) => "INVALID_INPUT",
            VenueError::SyncInProgress => "SYNC_IN_PROGRESS",
        }
    }
}

/// Convert VenueError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for VenueError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            VenueError::Network(_) | VenueError::Decode(_) => StatusCode::BAD_GATEWAY,
            VenueError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            VenueError::NotFound(_) => StatusCode::NOT_FOUND,
            VenueError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            VenueError::SyncInProgress => StatusCode::CONFLICT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(VenueError::Network("timeout".into()).is_recoverable());
        assert!(VenueError::Decode("bad json".into()).is_recoverable());
        assert!(!VenueError::Persistence("disk full".into()).is_recoverable());
        assert!(!VenueError::SyncInProgress.is_recoverable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            VenueError::NotFound("Cafe".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(VenueError::SyncInProgress.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            VenueError::Decode("x".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }
}
