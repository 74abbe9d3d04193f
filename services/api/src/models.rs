//! API models for request and response payloads
//!
//! Request fields are optional at the serde level so that a missing field is
//! reported by validation with a readable message instead of a decoder error.

use common::models::{Task, User};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::jwt::TokenPair;

/// Request for user registration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request for user login
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request for token refresh
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

/// Task creation payload, and also the partial payload accepted on update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// Public view of a user; never includes the password hash
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Outcome of a successful register or login
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: PublicUser,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// Response for register and login
#[derive(Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub session: AuthSession,
}

/// Response for token refresh
#[derive(Serialize)]
pub struct RefreshTokenResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

#[derive(Serialize)]
pub struct TaskResponse {
    pub task: Task,
}

#[derive(Serialize)]
pub struct TaskMessageResponse {
    pub message: &'static str,
    pub task: Task,
}

#[derive(Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
