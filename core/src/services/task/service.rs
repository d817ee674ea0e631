use std::sync::Arc;

use chrono::{DateTime, Utc};
use tg_shared::utils::validation::validators::{char_len, not_empty};
use uuid::Uuid;

use crate::domain::entities::task::{Task, TASK_TEXT_MAX_LENGTH};
use crate::errors::{DomainResult, ValidationError};
use crate::repositories::TaskRepository;

/// Task use cases: thin validation over the owner-scoped repository
pub struct TaskService<T: TaskRepository> {
    task_repository: Arc<T>,
}

impl<T: TaskRepository> TaskService<T> {
    pub fn new(task_repository: Arc<T>) -> Self {
        Self { task_repository }
    }

    pub async fn create_task(
        &self,
        user_id: Uuid,
        text: &str,
        group_id: Option<Uuid>,
        due_at: Option<DateTime<Utc>>,
    ) -> DomainResult<Task> {
        require_user(user_id)?;
        if !not_empty(text) {
            return Err(ValidationError::required("text").into());
        }
        let text = text.trim();
        if char_len(text) > TASK_TEXT_MAX_LENGTH {
            return Err(ValidationError::InvalidLength {
                field: "text".to_string(),
                max: TASK_TEXT_MAX_LENGTH,
            }
            .into());
        }

        let task = self
            .task_repository
            .create_task(Task::new(user_id, text, group_id, due_at))
            .await?;
        tracing::debug!(event = "task_created", task_id = %task.id, user_id = %user_id);
        Ok(task)
    }

    pub async fn get_tasks(&self, user_id: Uuid) -> DomainResult<Vec<Task>> {
        require_user(user_id)?;
        self.task_repository.get_tasks(user_id).await
    }

    pub async fn mark_task_completed(&self, task_id: Uuid, user_id: Uuid) -> DomainResult<Task> {
        require_user(user_id)?;
        self.task_repository.mark_task_completed(task_id, user_id).await
    }

    pub async fn mark_task_uncompleted(&self, task_id: Uuid, user_id: Uuid) -> DomainResult<Task> {
        require_user(user_id)?;
        self.task_repository
            .mark_task_uncompleted(task_id, user_id)
            .await
    }

    pub async fn delete_task(&self, task_id: Uuid, user_id: Uuid) -> DomainResult<()> {
        require_user(user_id)?;
        self.task_repository.delete_task(task_id, user_id).await?;
        tracing::debug!(event = "task_deleted", task_id = %task_id, user_id = %user_id);
        Ok(())
    }
}

fn require_user(user_id: Uuid) -> Result<(), ValidationError> {
    if user_id.is_nil() {
        return Err(ValidationError::required("user_id"));
    }
    Ok(())
}
