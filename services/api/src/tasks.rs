//! Ownership-scoped task operations
//!
//! Every operation takes the caller's already-authenticated user id. Lookups
//! by task id always include that owner, so a task belonging to another user
//! produces the same `NotFound` as a task that never existed.

use std::sync::Arc;

use common::{
    models::{NewTask, Task, TaskPatch},
    repositories::TaskStore,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::TaskRequest,
    validation,
};

/// Validate a creation payload. Nothing is written when this fails.
pub fn validate_new_task(request: TaskRequest) -> ApiResult<NewTask> {
    let title = request.title.unwrap_or_default();
    validation::validate_title(&title).map_err(ApiError::Validation)?;

    let description = request.description.unwrap_or_default();
    validation::validate_description(&description).map_err(ApiError::Validation)?;

    let status = match request.status.as_deref() {
        Some(status) => validation::parse_status(status).map_err(ApiError::Validation)?,
        None => Default::default(),
    };

    Ok(NewTask {
        title,
        description,
        status,
    })
}

/// Validate a partial update. Each supplied field must satisfy the creation
/// rules, which keeps the merged record valid.
pub fn validate_patch(request: TaskRequest) -> ApiResult<TaskPatch> {
    if let Some(title) = &request.title {
        validation::validate_title(title).map_err(ApiError::Validation)?;
    }
    if let Some(description) = &request.description {
        validation::validate_description(description).map_err(ApiError::Validation)?;
    }
    let status = request
        .status
        .as_deref()
        .map(validation::parse_status)
        .transpose()
        .map_err(ApiError::Validation)?;

    Ok(TaskPatch {
        title: request.title,
        description: request.description,
        status,
    })
}

/// Parse a task id from a path segment. Anything unparseable cannot name a
/// task the caller owns.
pub fn parse_task_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}

/// Task operations over a task store
#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }

    pub async fn create(&self, request: TaskRequest, user_id: Uuid) -> ApiResult<Task> {
        let new_task = validate_new_task(request)?;
        let task = self.tasks.create_task(user_id, new_task).await?;

        info!("User {} created task {}", user_id, task.id);
        Ok(task)
    }

    /// All of the caller's tasks, newest first
    pub async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Task>> {
        Ok(self.tasks.list_tasks(user_id).await?)
    }

    pub async fn get_one(&self, task_id: Uuid, user_id: Uuid) -> ApiResult<Task> {
        self.tasks
            .find_task(task_id, user_id)
            .await?
            .ok_or(ApiError::NotFound)
    }

    /// Apply a partial update and return the updated record
    pub async fn update(
        &self,
        task_id: Uuid,
        user_id: Uuid,
        request: TaskRequest,
    ) -> ApiResult<Task> {
        let patch = validate_patch(request)?;
        let task = self
            .tasks
            .update_task(task_id, user_id, patch)
            .await?
            .ok_or(ApiError::NotFound)?;

        info!("User {} updated task {}", user_id, task.id);
        Ok(task)
    }

    pub async fn delete(&self, task_id: Uuid, user_id: Uuid) -> ApiResult<()> {
        if !self.tasks.delete_task(task_id, user_id).await? {
            return Err(ApiError::NotFound);
        }

        info!("User {} deleted task {}", user_id, task_id);
        Ok(())
    }
}
