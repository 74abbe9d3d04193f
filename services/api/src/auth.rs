//! Credential verification: registration, login and refresh exchange

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use common::{error::StoreError, models::NewUser, repositories::UserStore};
use tracing::{info, warn};

use crate::{
    error::{ApiError, ApiResult},
    jwt::{TokenError, TokenPair, TokenRole, TokenService},
    models::{AuthSession, LoginRequest, PublicUser, RegisterRequest},
    validation,
};

/// Hash a password with argon2id and a random salt
pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a stored PHC hash
pub fn verify_password(password: &str, hash: &str) -> ApiResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| ApiError::Internal(format!("Failed to parse password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Run an argon2 operation off the async worker threads
async fn blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("Password hashing task failed: {}", e)))?
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Registration, login and token refresh over a user store
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// Register a new user and issue their first token pair
    pub async fn register(&self, request: RegisterRequest) -> ApiResult<AuthSession> {
        let username = request.username.unwrap_or_default();
        let email = request.email.unwrap_or_default();
        let password = request.password.unwrap_or_default();

        validation::validate_username(&username).map_err(ApiError::Validation)?;
        validation::validate_email(email.trim()).map_err(ApiError::Validation)?;
        validation::validate_password(&password).map_err(ApiError::Validation)?;

        let username = username.trim().to_string();
        let email = normalize_email(&email);

        if self
            .users
            .find_by_email_or_username(&email, &username)
            .await?
            .is_some()
        {
            info!("Registration rejected, user exists: {}", username);
            return Err(ApiError::DuplicateUser);
        }

        let password_hash = blocking(move || hash_password(&password)).await?;

        let user = self
            .users
            .create_user(NewUser {
                username,
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent registration
                StoreError::Conflict(_) => ApiError::DuplicateUser,
                other => ApiError::Store(other),
            })?;

        info!("Registered user {} ({})", user.username, user.id);

        Ok(AuthSession {
            user: PublicUser::from(&user),
            tokens: self.tokens.issue(user.id)?,
        })
    }

    /// Verify credentials and issue a fresh token pair
    ///
    /// An unknown email and a wrong password fail with the same error.
    pub async fn login(&self, request: LoginRequest) -> ApiResult<AuthSession> {
        let email = normalize_email(request.email.as_deref().unwrap_or_default());
        let password = request.password.unwrap_or_default();

        let Some(user) = self.users.find_by_email(&email).await? else {
            return Err(ApiError::InvalidCredentials);
        };

        let hash = user.password_hash.clone();
        if !blocking(move || verify_password(&password, &hash)).await? {
            return Err(ApiError::InvalidCredentials);
        }

        info!("User logged in: {}", user.id);

        Ok(AuthSession {
            user: PublicUser::from(&user),
            tokens: self.tokens.issue(user.id)?,
        })
    }

    /// Exchange a valid refresh token for a new pair
    pub async fn refresh(&self, refresh_token: &str) -> ApiResult<TokenPair> {
        let user_id = self
            .tokens
            .validate(refresh_token, TokenRole::Refresh)
            .inspect_err(|e| warn!("Rejected refresh token: {}", e))?;

        let user = self
            .users
            .find_user_by_id(user_id)
            .await?
            .ok_or(ApiError::TokenInvalid(TokenError::Malformed))?;

        info!("Refreshed tokens for user: {}", user.id);
        Ok(self.tokens.issue(user.id)?)
    }
}
