//! Error types for the auth bridge
//!
//! Only failures that must reach the hosting framework live here. Missing form
//! bodies and malformed cookie headers degrade silently and never surface as
//! errors.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Errors raised while bridging a request to the authentication engine
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The catch-all route segment does not name a known action
    #[error("Unknown auth action: {0}")]
    UnknownAction(String),

    /// The authentication engine failed; passed through untouched
    #[error("Authentication engine error: {0}")]
    Engine(#[from] anyhow::Error),

    /// The engine answered a csrf request without a token
    #[error("Authentication engine returned no CSRF token")]
    MissingCsrfToken,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BridgeError {
    /// Short machine readable code used in JSON error bodies
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::UnknownAction(_) => "unknown_action",
            BridgeError::Engine(_) => "engine_error",
            BridgeError::MissingCsrfToken => "missing_csrf_token",
            BridgeError::Serialization(_) => "server_error",
        }
    }
}

impl ResponseError for BridgeError {
    fn status_code(&self) -> StatusCode {
        match self {
            BridgeError::UnknownAction(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.code(),
            "error_description": self.to_string(),
        }))
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, BridgeError>;
