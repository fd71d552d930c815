// Error handling types for the API

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::error;

use super::validation::ValidationResult;
use crate::auth::tokens::TokenError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    InvalidCredentials,
    TokenExpired,
    NotFound(String),
    EmailAlreadyExists,
    InvalidImageSize(u64),
    InvalidImageFormat(String),
    StorageError(String),
    BadRequest(String),
    InternalServer(String),
    DatabaseError(sqlx::Error),
    TokenError(TokenError),
    ValidationError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::InvalidCredentials => write!(f, "Invalid email or password"),
            ApiError::TokenExpired => write!(f, "Refresh token has expired"),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::EmailAlreadyExists => write!(f, "Email is already registered"),
            ApiError::InvalidImageSize(max_mb) => {
                write!(f, "Image exceeds the maximum size of {}MB", max_mb)
            }
            ApiError::InvalidImageFormat(allowed) => {
                write!(f, "Image format not allowed, expected one of {}", allowed)
            }
            ApiError::StorageError(msg) => write!(f, "Storage Error: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
            ApiError::DatabaseError(e) => write!(f, "Database Error: {}", e),
            ApiError::TokenError(e) => write!(f, "Token Error: {}", e),
            ApiError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

/// JSON error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, code) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, "UNAUTHORIZED"),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_string(),
                "INVALID_CREDENTIALS",
            ),
            ApiError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "Refresh token has expired".to_string(),
                "TOKEN_EXPIRED",
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND"),
            ApiError::EmailAlreadyExists => (
                StatusCode::CONFLICT,
                "Email is already registered".to_string(),
                "EMAIL_ALREADY_EXISTS",
            ),
            ApiError::InvalidImageSize(max_mb) => (
                StatusCode::BAD_REQUEST,
                format!("Image exceeds the maximum size of {}MB", max_mb),
                "INVALID_IMAGE_SIZE",
            ),
            ApiError::InvalidImageFormat(allowed) => (
                StatusCode::BAD_REQUEST,
                format!("Image format not allowed, expected one of {}", allowed),
                "INVALID_IMAGE_FORMAT",
            ),
            ApiError::StorageError(msg) => (StatusCode::BAD_REQUEST, msg, "STORAGE_ERROR"),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            ApiError::InternalServer(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                msg,
                "INTERNAL_SERVER_ERROR",
            ),
            ApiError::DatabaseError(e) => {
                error!(error = %e, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database operation failed".to_string(),
                    "DATABASE_ERROR",
                )
            }
            // A malformed refresh token surfaces like any other bad credential.
            ApiError::TokenError(e) => {
                error!(error = %e, "Token error occurred");
                (
                    StatusCode::UNAUTHORIZED,
                    "Invalid token".to_string(),
                    "INVALID_TOKEN",
                )
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg, "VALIDATION_ERROR"),
        };

        let error_response = ErrorResponse {
            error: error_message,
            code: code.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::TokenError(err)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::DatabaseError(err)
    }
}

/// Helper function to convert ValidationResult to ApiError
impl From<ValidationResult> for ApiError {
    fn from(result: ValidationResult) -> Self {
        if result.is_valid {
            ApiError::InternalServer(
                "Validation result was valid but converted to error".to_string(),
            )
        } else {
            let error_messages: Vec<String> = result
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect();
            ApiError::ValidationError(error_messages.join(", "))
        }
    }
}
