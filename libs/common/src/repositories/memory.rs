//! In-memory repositories for tests and local development

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{TaskStore, UserStore};
use crate::error::{StoreError, StoreResult};
use crate::models::{NewTask, NewUser, Task, TaskPatch, User};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    /// Tasks keyed by id, with an insertion sequence used to break
    /// `created_at` ties when listing.
    tasks: HashMap<Uuid, (u64, Task)>,
    next_seq: u64,
}

/// Thread-safe in-memory store. Each operation runs under a single lock
/// acquisition, which gives the same atomicity as one SQL statement.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.lock().await;

        if let Some(existing) = tables
            .users
            .values()
            .find(|u| u.email == new_user.email || u.username == new_user.username)
        {
            let constraint = if existing.email == new_user.email {
                "users_email_key"
            } else {
                "users_username_key"
            };
            return Err(StoreError::Conflict(constraint.to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email == email || u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.get(&id).cloned())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, owner: Uuid, task: NewTask) -> StoreResult<Task> {
        let mut tables = self.tables.lock().await;

        if !tables.users.contains_key(&owner) {
            return Err(StoreError::MissingOwner);
        }

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: task.title,
            description: task.description,
            status: task.status,
            user_id: owner,
            created_at: now,
            updated_at: now,
        };

        let seq = tables.next_seq;
        tables.next_seq += 1;
        tables.tasks.insert(task.id, (seq, task.clone()));

        Ok(task)
    }

    async fn list_tasks(&self, owner: Uuid) -> StoreResult<Vec<Task>> {
        let tables = self.tables.lock().await;

        let mut owned: Vec<&(u64, Task)> = tables
            .tasks
            .values()
            .filter(|(_, t)| t.user_id == owner)
            .collect();
        owned.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at.cmp(&a.created_at).then(seq_b.cmp(seq_a))
        });

        Ok(owned.into_iter().map(|(_, t)| t.clone()).collect())
    }

    async fn find_task(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Task>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .tasks
            .get(&id)
            .filter(|(_, t)| t.user_id == owner)
            .map(|(_, t)| t.clone()))
    }

    async fn update_task(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: TaskPatch,
    ) -> StoreResult<Option<Task>> {
        let mut tables = self.tables.lock().await;

        match tables.tasks.get_mut(&id) {
            Some((_, task)) if task.user_id == owner => {
                patch.apply_to(task);
                task.updated_at = Utc::now();
                Ok(Some(task.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_task(&self, id: Uuid, owner: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;

        let owned = tables
            .tasks
            .get(&id)
            .is_some_and(|(_, t)| t.user_id == owner);
        if owned {
            tables.tasks.remove(&id);
        }

        Ok(owned)
    }
}
