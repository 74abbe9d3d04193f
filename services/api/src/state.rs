//! Application state shared across handlers

use std::sync::Arc;

use common::repositories::{TaskStore, UserStore};

use crate::{auth::AuthService, config::JwtConfig, jwt::TokenService, tasks::TaskService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub task_service: TaskService,
    pub token_service: TokenService,
}

impl AppState {
    /// Wire the services over the given stores. Secrets come in through
    /// `jwt` and are never read from the environment here.
    pub fn new(jwt: &JwtConfig, users: Arc<dyn UserStore>, tasks: Arc<dyn TaskStore>) -> Self {
        let token_service = TokenService::new(jwt);

        Self {
            auth_service: AuthService::new(users, token_service.clone()),
            task_service: TaskService::new(tasks),
            token_service,
        }
    }
}
