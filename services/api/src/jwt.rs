//! JWT service for token issuance and validation
//!
//! Access and refresh tokens are HS256 JWTs signed with two independent
//! secrets, so a leaked access secret cannot mint refresh tokens. Tokens carry
//! only the user id and the issue/expiry timestamps. Validation is a pure
//! function of the token, the role's secret and the current time; nothing is
//! stored server-side.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::JwtConfig;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Issued at time (seconds since the epoch)
    pub iat: i64,
    /// Expiration time (seconds since the epoch)
    pub exp: i64,
}

/// Which secret and lifetime a token is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRole {
    Access,
    Refresh,
}

/// Reasons a token is rejected
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature does not verify")]
    BadSignature,
    #[error("token has expired")]
    Expired,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Freshly issued access/refresh pair
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

struct RoleKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: i64,
}

/// JWT service
#[derive(Clone)]
pub struct TokenService {
    access: Arc<RoleKeys>,
    refresh: Arc<RoleKeys>,
    validation: Validation,
}

impl TokenService {
    /// Initialize a new JWT service from already-validated configuration
    pub fn new(config: &JwtConfig) -> Self {
        let keys = |secret: &str, ttl: u64| RoleKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: i64::try_from(ttl).unwrap_or(i64::MAX),
        };

        // Expiry is checked by hand in `validate_at` so that a token is
        // rejected exactly at `exp`, with no leeway.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::from(["exp".to_string()]);

        Self {
            access: Arc::new(keys(&config.jwt_secret, config.jwt_access_token_expiry)),
            refresh: Arc::new(keys(&config.jwt_refresh_secret, config.jwt_refresh_token_expiry)),
            validation,
        }
    }

    fn keys(&self, role: TokenRole) -> &RoleKeys {
        match role {
            TokenRole::Access => &self.access,
            TokenRole::Refresh => &self.refresh,
        }
    }

    /// Sign a single token for `user_id` issued at `now`
    pub fn sign_at(&self, user_id: Uuid, role: TokenRole, now: i64) -> Result<String, TokenError> {
        let keys = self.keys(role);
        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now.saturating_add(keys.ttl),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Issue a new access/refresh pair for `user_id`
    pub fn issue(&self, user_id: Uuid) -> Result<TokenPair, TokenError> {
        self.issue_at(user_id, Utc::now().timestamp())
    }

    pub fn issue_at(&self, user_id: Uuid, now: i64) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.sign_at(user_id, TokenRole::Access, now)?,
            refresh_token: self.sign_at(user_id, TokenRole::Refresh, now)?,
        })
    }

    /// Validate a token for `role` against the current time and return the
    /// embedded user id
    pub fn validate(&self, token: &str, role: TokenRole) -> Result<Uuid, TokenError> {
        self.validate_at(token, role, Utc::now().timestamp())
    }

    /// Validate a token for `role` as of `now`. A token is valid strictly
    /// before its `exp` instant.
    pub fn validate_at(&self, token: &str, role: TokenRole, now: i64) -> Result<Uuid, TokenError> {
        let data = decode::<Claims>(token, &self.keys(role).decoding, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            },
        )?;

        if now >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims.sub)
    }
}
