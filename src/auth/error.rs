// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

/// Authentication and authorization error types
#[derive(Debug)]
pub enum AuthError {
    // Authentication errors
    MissingToken,
    /// Bad signature, malformed, or expired
    InvalidToken,
    TokenGenerationError(String),

    // Authorization errors
    /// Authenticated user asked for another user's data
    IdentityMismatch {
        authenticated: String,
        requested: String,
    },
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Missing session token"),
            AuthError::InvalidToken => write!(f, "Invalid session token"),
            AuthError::TokenGenerationError(msg) => write!(f, "Token generation error: {}", msg),
            AuthError::IdentityMismatch {
                authenticated,
                requested,
            } => write!(
                f,
                "Identity mismatch: '{}' requested data of '{}'",
                authenticated, requested
            ),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::MissingToken => warn!("Missing token cookie in request"),
            AuthError::InvalidToken => warn!("Invalid token attempt"),
            AuthError::TokenGenerationError(msg) => error!("Token generation error: {}", msg),
            AuthError::IdentityMismatch { .. } => warn!("{}", self),
        }

        let body = Json(json!({
            "error": self.error_message(),
        }));

        (self.status_code(), body).into_response()
    }
}

impl AuthError {
    /// Get the HTTP status code for this error
    ///
    /// Identity mismatch answers 402, which existing clients check for.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::TokenGenerationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::IdentityMismatch { .. } => StatusCode::PAYMENT_REQUIRED,
        }
    }

    /// Get a descriptive error message for this error
    /// This message is safe to send to clients (no sensitive data)
    pub fn error_message(&self) -> String {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken => "Access Denied".to_string(),
            AuthError::TokenGenerationError(_) => "Internal server error".to_string(),
            AuthError::IdentityMismatch { .. } => "Unauthorized Access".to_string(),
        }
    }
}
