//! Repositories for user and task records
//!
//! The traits here are the only way the service layer touches storage. Every
//! task lookup that names a task id also names its owner, and implementations
//! must resolve the pair in a single atomic step so that a task owned by
//! someone else is indistinguishable from one that does not exist.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::models::{NewTask, NewUser, Task, TaskPatch, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Durable user records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user. Fails with `StoreError::Conflict` when the
    /// username or email is already taken.
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User>;

    /// Find a user whose email or username matches
    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> StoreResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
}

/// Durable task records, always addressed through their owner
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create_task(&self, owner: Uuid, task: NewTask) -> StoreResult<Task>;

    /// All tasks owned by `owner`, newest first
    async fn list_tasks(&self, owner: Uuid) -> StoreResult<Vec<Task>>;

    async fn find_task(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Task>>;

    /// Apply `patch` to the task matching both `id` and `owner`.
    /// Returns `None` when no such task exists.
    async fn update_task(&self, id: Uuid, owner: Uuid, patch: TaskPatch)
    -> StoreResult<Option<Task>>;

    /// Remove the task matching both `id` and `owner`.
    /// Returns whether a record was deleted.
    async fn delete_task(&self, id: Uuid, owner: Uuid) -> StoreResult<bool>;
}
