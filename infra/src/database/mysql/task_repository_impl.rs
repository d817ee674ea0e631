//! MySQL implementation of the TaskRepository trait.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use tg_core::domain::entities::task::Task;
use tg_core::errors::{DomainError, ResourceError};
use tg_core::repositories::TaskRepository;

use super::rows::{column, optional_uuid_column, storage_error, uuid_column};

pub(crate) const TASK_COLUMNS: &str = "id, user_id, group_id, text, is_completed, is_deleted, \
     completed_at, deleted_at, due_at, created_at";

/// MySQL implementation of TaskRepository
///
/// Every statement is scoped by `user_id` and skips soft-deleted rows.
pub struct MySqlTaskRepository {
    pool: MySqlPool,
}

impl MySqlTaskRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub(crate) fn row_to_task(row: &MySqlRow) -> Result<Task, DomainError> {
        Ok(Task {
            id: uuid_column(row, "id")?,
            user_id: uuid_column(row, "user_id")?,
            group_id: optional_uuid_column(row, "group_id")?,
            text: column(row, "text")?,
            is_completed: column(row, "is_completed")?,
            is_deleted: column(row, "is_deleted")?,
            completed_at: column(row, "completed_at")?,
            deleted_at: column(row, "deleted_at")?,
            due_at: column(row, "due_at")?,
            created_at: column(row, "created_at")?,
        })
    }

    async fn find_owned(&self, task_id: Uuid, user_id: Uuid) -> Result<Task, DomainError> {
        let query = format!(
            "SELECT {} FROM tasks WHERE id = ? AND user_id = ? AND is_deleted = FALSE",
            TASK_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(task_id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("find task"))?
            .ok_or(ResourceError::TaskNotFound)?;

        Self::row_to_task(&row)
    }

    async fn set_completion(
        &self,
        task_id: Uuid,
        user_id: Uuid,
        completed: bool,
    ) -> Result<Task, DomainError> {
        let completed_at = completed.then(Utc::now);
        sqlx::query(
            r#"
            UPDATE tasks
            SET is_completed = ?, completed_at = ?
            WHERE id = ? AND user_id = ? AND is_deleted = FALSE
            "#,
        )
        .bind(completed)
        .bind(completed_at)
        .bind(task_id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(storage_error("update task completion"))?;

        self.find_owned(task_id, user_id).await
    }
}

#[async_trait]
impl TaskRepository for MySqlTaskRepository {
    async fn get_tasks(&self, user_id: Uuid) -> Result<Vec<Task>, DomainError> {
        let query = format!(
            r#"
            SELECT {} FROM tasks
            WHERE user_id = ? AND is_deleted = FALSE
            ORDER BY created_at DESC
            "#,
            TASK_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("list tasks"))?;

        rows.iter().map(Self::row_to_task).collect()
    }

    async fn create_task(&self, task: Task) -> Result<Task, DomainError> {
        if let Some(group_id) = task.group_id {
            let row = sqlx::query(
                r#"
                SELECT COUNT(*) AS owned FROM `groups`
                WHERE id = ? AND user_id = ? AND is_deleted = FALSE
                "#,
            )
            .bind(group_id.to_string())
            .bind(task.user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error("check task group"))?;

            let owned: i64 = column(&row, "owned")?;
            if owned == 0 {
                return Err(ResourceError::GroupNotFound.into());
            }
        }

        let query = format!(
            "INSERT INTO tasks ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            TASK_COLUMNS
        );
        sqlx::query(&query)
            .bind(task.id.to_string())
            .bind(task.user_id.to_string())
            .bind(task.group_id.map(|id| id.to_string()))
            .bind(&task.text)
            .bind(task.is_completed)
            .bind(task.is_deleted)
            .bind(task.completed_at)
            .bind(task.deleted_at)
            .bind(task.due_at)
            .bind(task.created_at)
            .execute(&self.pool)
            .await
            .map_err(storage_error("insert task"))?;

        Ok(task)
    }

    async fn mark_task_completed(
        &self,
        task_id: Uuid,
        user_id: Uuid,
    ) -> Result<Task, DomainError> {
        self.set_completion(task_id, user_id, true).await
    }

    async fn mark_task_uncompleted(
        &self,
        task_id: Uuid,
        user_id: Uuid,
    ) -> Result<Task, DomainError> {
        self.set_completion(task_id, user_id, false).await
    }

    async fn delete_task(&self, task_id: Uuid, user_id: Uuid) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET is_deleted = TRUE, deleted_at = ?
            WHERE id = ? AND user_id = ? AND is_deleted = FALSE
            "#,
        )
        .bind(Utc::now())
        .bind(task_id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(storage_error("delete task"))?;

        if result.rows_affected() == 0 {
            return Err(ResourceError::TaskNotFound.into());
        }
        Ok(())
    }
}
