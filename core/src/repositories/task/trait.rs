//! Task repository trait.
//!
//! Every operation is scoped by the owning `user_id` and only sees rows that
//! are not soft-deleted; a guessed id of another user's task behaves exactly
//! like a missing one.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::task::Task;
use crate::errors::DomainError;

#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Active tasks of a user, newest first
    async fn get_tasks(&self, user_id: Uuid) -> Result<Vec<Task>, DomainError>;

    /// Persist a new task
    ///
    /// When `group_id` is set it must reference an active group of the same
    /// user, otherwise `ResourceError::GroupNotFound`.
    async fn create_task(&self, task: Task) -> Result<Task, DomainError>;

    /// Set `is_completed` and `completed_at`
    async fn mark_task_completed(&self, task_id: Uuid, user_id: Uuid)
        -> Result<Task, DomainError>;

    /// Clear `is_completed` and `completed_at`
    async fn mark_task_uncompleted(
        &self,
        task_id: Uuid,
        user_id: Uuid,
    ) -> Result<Task, DomainError>;

    /// Soft-delete a task (`ResourceError::TaskNotFound` when absent)
    async fn delete_task(&self, task_id: Uuid, user_id: Uuid) -> Result<(), DomainError>;
}
