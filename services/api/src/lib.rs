//! Personal task service
//!
//! Users register and log in to receive a pair of signed tokens, then manage
//! a list of tasks that only they can see or change. The crate is organised
//! leaves-first:
//!
//! - [`jwt`]: stateless access/refresh token issuance and validation
//! - [`auth`]: credential verification (register, login, refresh)
//! - [`tasks`]: ownership-scoped task operations
//! - [`routes`] and [`middleware`]: the HTTP JSON transport
//!
//! Storage lives in the `common` crate behind the `UserStore` and
//! `TaskStore` traits.

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod tasks;
pub mod validation;

pub use routes::create_router;
pub use state::AppState;
