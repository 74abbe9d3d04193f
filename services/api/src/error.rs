//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::jwt::TokenError;

/// Message shared by every login failure so the response never reveals
/// whether the email exists.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Message shared by missing and foreign tasks.
pub const TASK_NOT_FOUND: &str = "Task not found";

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or out-of-range input
    #[error("{0}")]
    Validation(String),

    /// Registration collided with an existing email or username
    #[error("User already exists with this email or username")]
    DuplicateUser,

    /// Unknown email or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No bearer token on a protected route
    #[error("Access token required")]
    MissingToken,

    /// Bad signature, malformed or expired token
    #[error("Invalid or expired token")]
    TokenInvalid(#[source] TokenError),

    /// The task does not exist or belongs to someone else
    #[error("Task not found")]
    NotFound,

    /// Storage failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::DuplicateUser => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::MissingToken | ApiError::TokenInvalid(_) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message; internal details never leave the process
    pub fn message(&self) -> String {
        match self {
            ApiError::Validation(msg) => msg.clone(),
            ApiError::InvalidCredentials => INVALID_CREDENTIALS.to_string(),
            ApiError::NotFound => TASK_NOT_FOUND.to_string(),
            ApiError::TokenInvalid(_) => "Invalid or expired token".to_string(),
            ApiError::Store(_) | ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "message": self.message(),
        }));

        (status, body).into_response()
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(msg) => ApiError::Internal(msg),
            other => ApiError::TokenInvalid(other),
        }
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_are_masked() {
        let err = ApiError::Store(StoreError::Corrupt("status 'x'".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn test_token_errors_share_one_message() {
        let expired = ApiError::from(TokenError::Expired);
        let malformed = ApiError::from(TokenError::Malformed);
        assert_eq!(expired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(expired.message(), malformed.message());
    }

    #[test]
    fn test_signing_failure_is_internal() {
        let err = ApiError::from(TokenError::Signing("key".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_duplicate_user_is_bad_request() {
        let err = ApiError::DuplicateUser;
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.message(),
            "User already exists with this email or username"
        );
    }
}
