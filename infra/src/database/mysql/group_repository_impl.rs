//! MySQL implementation of the GroupRepository trait.
//!
//! The table is named `groups`, a reserved word since MySQL 8, so it is
//! always quoted.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use tg_core::domain::entities::group::Group;
use tg_core::domain::entities::task::Task;
use tg_core::errors::{DomainError, ResourceError};
use tg_core::repositories::GroupRepository;

use super::rows::{column, storage_error, uuid_column};
use super::task_repository_impl::{MySqlTaskRepository, TASK_COLUMNS};

const GROUP_COLUMNS: &str =
    "g.id, g.user_id, g.name, g.description, g.is_deleted, g.deleted_at, g.created_at, g.updated_at";

/// Which groups a listing keeps, judged by their open tasks
#[derive(Clone, Copy)]
enum Completion {
    Any,
    HasOpenTasks,
    NoOpenTasks,
}

impl Completion {
    /// Extra `WHERE` clause on the `g` alias
    fn condition(self) -> &'static str {
        match self {
            Completion::Any => "",
            Completion::HasOpenTasks => {
                " AND EXISTS (SELECT 1 FROM tasks t \
                 WHERE t.group_id = g.id AND t.is_deleted = FALSE AND t.is_completed = FALSE)"
            }
            Completion::NoOpenTasks => {
                " AND NOT EXISTS (SELECT 1 FROM tasks t \
                 WHERE t.group_id = g.id AND t.is_deleted = FALSE AND t.is_completed = FALSE)"
            }
        }
    }
}

/// MySQL implementation of GroupRepository
pub struct MySqlGroupRepository {
    pool: MySqlPool,
}

impl MySqlGroupRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_group(row: &MySqlRow) -> Result<Group, DomainError> {
        Ok(Group {
            id: uuid_column(row, "id")?,
            user_id: uuid_column(row, "user_id")?,
            name: column(row, "name")?,
            description: column(row, "description")?,
            is_deleted: column(row, "is_deleted")?,
            deleted_at: column(row, "deleted_at")?,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
            tasks: Vec::new(),
        })
    }

    async fn find_owned(&self, group_id: Uuid, user_id: Uuid) -> Result<Group, DomainError> {
        let query = format!(
            "SELECT {} FROM `groups` g WHERE g.id = ? AND g.user_id = ? AND g.is_deleted = FALSE",
            GROUP_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(group_id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("find group"))?
            .ok_or(ResourceError::GroupNotFound)?;

        Self::row_to_group(&row)
    }

    /// Active groups of a user, newest first, filtered by completion
    async fn list(&self, user_id: Uuid, completion: Completion) -> Result<Vec<Group>, DomainError> {
        let query = format!(
            r#"
            SELECT {} FROM `groups` g
            WHERE g.user_id = ? AND g.is_deleted = FALSE{}
            ORDER BY g.created_at DESC
            "#,
            GROUP_COLUMNS,
            completion.condition()
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("list groups"))?;

        rows.iter().map(Self::row_to_group).collect()
    }

    /// Active grouped tasks of a user, oldest first, keyed by group
    async fn tasks_by_group(&self, user_id: Uuid) -> Result<HashMap<Uuid, Vec<Task>>, DomainError> {
        let query = format!(
            r#"
            SELECT {} FROM tasks
            WHERE user_id = ? AND group_id IS NOT NULL AND is_deleted = FALSE
            ORDER BY created_at ASC
            "#,
            TASK_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("load group tasks"))?;

        let mut grouped: HashMap<Uuid, Vec<Task>> = HashMap::new();
        for row in &rows {
            let task = MySqlTaskRepository::row_to_task(row)?;
            if let Some(group_id) = task.group_id {
                grouped.entry(group_id).or_default().push(task);
            }
        }
        Ok(grouped)
    }

    async fn list_with_tasks(
        &self,
        user_id: Uuid,
        completion: Completion,
    ) -> Result<Vec<Group>, DomainError> {
        let mut groups = self.list(user_id, completion).await?;
        if groups.is_empty() {
            return Ok(groups);
        }

        let mut tasks = self.tasks_by_group(user_id).await?;
        for group in &mut groups {
            group.tasks = tasks.remove(&group.id).unwrap_or_default();
        }
        Ok(groups)
    }
}

#[async_trait]
impl GroupRepository for MySqlGroupRepository {
    async fn get_groups(&self, user_id: Uuid) -> Result<Vec<Group>, DomainError> {
        self.list(user_id, Completion::Any).await
    }

    async fn get_group(&self, group_id: Uuid, user_id: Uuid) -> Result<Group, DomainError> {
        let mut group = self.find_owned(group_id, user_id).await?;

        let query = format!(
            r#"
            SELECT {} FROM tasks
            WHERE group_id = ? AND user_id = ? AND is_deleted = FALSE
            ORDER BY created_at ASC
            "#,
            TASK_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(group_id.to_string())
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("load group tasks"))?;

        group.tasks = rows
            .iter()
            .map(MySqlTaskRepository::row_to_task)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(group)
    }

    async fn get_groups_uncomplete(&self, user_id: Uuid) -> Result<Vec<Group>, DomainError> {
        self.list_with_tasks(user_id, Completion::HasOpenTasks).await
    }

    async fn get_groups_complete(&self, user_id: Uuid) -> Result<Vec<Group>, DomainError> {
        self.list_with_tasks(user_id, Completion::NoOpenTasks).await
    }

    async fn create_group(&self, group: Group) -> Result<Group, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO `groups` (
                id, user_id, name, description, is_deleted, deleted_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(group.id.to_string())
        .bind(group.user_id.to_string())
        .bind(&group.name)
        .bind(&group.description)
        .bind(group.is_deleted)
        .bind(group.deleted_at)
        .bind(group.created_at)
        .bind(group.updated_at)
        .execute(&self.pool)
        .await
        .map_err(storage_error("insert group"))?;

        Ok(group)
    }

    async fn update_group(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Group, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE `groups`
            SET name = ?, description = ?, updated_at = ?
            WHERE id = ? AND user_id = ? AND is_deleted = FALSE
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(Utc::now())
        .bind(group_id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(storage_error("update group"))?;

        if result.rows_affected() == 0 {
            return Err(ResourceError::GroupNotFound.into());
        }
        self.find_owned(group_id, user_id).await
    }

    async fn delete_group(&self, group_id: Uuid, user_id: Uuid) -> Result<(), DomainError> {
        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error("begin transaction"))?;

        let result = sqlx::query(
            r#"
            UPDATE `groups`
            SET is_deleted = TRUE, deleted_at = ?
            WHERE id = ? AND user_id = ? AND is_deleted = FALSE
            "#,
        )
        .bind(now)
        .bind(group_id.to_string())
        .bind(user_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(storage_error("delete group"))?;

        if result.rows_affected() == 0 {
            return Err(ResourceError::GroupNotFound.into());
        }

        let cascaded = sqlx::query(
            r#"
            UPDATE tasks
            SET is_deleted = TRUE, deleted_at = ?
            WHERE group_id = ? AND is_deleted = FALSE
            "#,
        )
        .bind(now)
        .bind(group_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(storage_error("delete group tasks"))?;

        tx.commit()
            .await
            .map_err(storage_error("commit group deletion"))?;

        tracing::debug!(
            event = "group_cascade",
            group_id = %group_id,
            tasks = cascaded.rows_affected()
        );
        Ok(())
    }
}
