//! Authentication middleware for JWT token validation

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::warn;
use uuid::Uuid;

use crate::{error::ApiError, jwt::TokenRole, state::AppState};

/// Authenticated caller, valid for the lifetime of one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
}

/// Authentication middleware
///
/// Validates the bearer access token and inserts the caller's [`AuthUser`]
/// into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(ApiError::MissingToken)?;

    let id = state
        .token_service
        .validate(bearer.token(), TokenRole::Access)
        .inspect_err(|e| warn!("Rejected access token: {}", e))?;

    req.extensions_mut().insert(AuthUser { id });

    Ok(next.run(req).await)
}
