// Error handling module for the Car Doctor API
// Provides centralized error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error};

use crate::auth::AuthError;
use crate::store::StoreError;

/// Main error type for the API
/// All handlers should return Result<T, ApiError>
#[derive(Debug)]
pub enum ApiError {
    /// Validation errors from request validation
    /// Maps to HTTP 400 Bad Request
    ValidationError(validator::ValidationErrors),

    /// Datastore failures, including malformed identifiers
    /// Maps to HTTP 500 Internal Server Error
    /// Sensitive details are filtered from client responses
    StoreError(StoreError),

    /// Authentication and authorization failures keep their own response shape
    Auth(AuthError),
}

/// Consistent error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "VALIDATION_ERROR")
    pub error_code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details (e.g., field-level validation errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// ISO 8601 timestamp of when the error occurred
    pub timestamp: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            ApiError::Auth(auth_error) => return auth_error.into_response(),
            ApiError::ValidationError(errors) => validation_error_response(&errors),
            ApiError::StoreError(store_error) => store_error_response(&store_error),
        };
        (status, Json(error_response)).into_response()
    }
}

fn validation_error_response(errors: &validator::ValidationErrors) -> (StatusCode, ErrorResponse) {
    debug!("Validation error: {:?}", errors);

    (
        StatusCode::BAD_REQUEST,
        ErrorResponse {
            error_code: "VALIDATION_ERROR".to_string(),
            message: "Request validation failed".to_string(),
            details: Some(serde_json::to_value(errors).unwrap_or(serde_json::json!({}))),
            timestamp: Utc::now().to_rfc3339(),
        },
    )
}

/// Store errors are logged in full and answered with a generic message
fn store_error_response(store_error: &StoreError) -> (StatusCode, ErrorResponse) {
    error!("Store error: {:?}", store_error);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorResponse {
            error_code: "DATABASE_ERROR".to_string(),
            message: "A database error occurred".to_string(),
            details: None,
            timestamp: Utc::now().to_rfc3339(),
        },
    )
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        ApiError::StoreError(error)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors)
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        ApiError::Auth(error)
    }
}
