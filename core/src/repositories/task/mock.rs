//! Mock implementation of TaskRepository for testing

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::group::Group;
use crate::domain::entities::task::Task;
use crate::errors::{DomainError, ResourceError};

use super::trait_::TaskRepository;

/// In-memory tables shared by the task and group mocks
#[derive(Default)]
pub(crate) struct TaskGroupStore {
    pub(crate) groups: HashMap<Uuid, Group>,
    pub(crate) tasks: HashMap<Uuid, Task>,
}

impl TaskGroupStore {
    /// Active group owned by `user_id`
    pub(crate) fn owned_group(&self, group_id: Uuid, user_id: Uuid) -> Option<&Group> {
        self.groups
            .get(&group_id)
            .filter(|g| g.user_id == user_id && !g.is_deleted)
    }

    /// Active tasks of a group, oldest first
    pub(crate) fn group_tasks(&self, group_id: Uuid) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .values()
            .filter(|t| t.group_id == Some(group_id) && t.is_active())
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.created_at);
        tasks
    }

    fn owned_task_mut(&mut self, task_id: Uuid, user_id: Uuid) -> Option<&mut Task> {
        self.tasks
            .get_mut(&task_id)
            .filter(|t| t.user_id == user_id && t.is_active())
    }
}

/// Mock task repository for testing
#[derive(Clone)]
pub struct MockTaskRepository {
    store: Arc<RwLock<TaskGroupStore>>,
}

impl MockTaskRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::with_store(Arc::new(RwLock::new(TaskGroupStore::default())))
    }

    pub(crate) fn with_store(store: Arc<RwLock<TaskGroupStore>>) -> Self {
        Self { store }
    }

    /// Raw task row, soft-deleted ones included
    pub async fn raw_task(&self, task_id: Uuid) -> Option<Task> {
        self.store.read().await.tasks.get(&task_id).cloned()
    }
}

impl Default for MockTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskRepository for MockTaskRepository {
    async fn get_tasks(&self, user_id: Uuid) -> Result<Vec<Task>, DomainError> {
        let store = self.store.read().await;
        let mut tasks: Vec<Task> = store
            .tasks
            .values()
            .filter(|t| t.user_id == user_id && t.is_active())
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn create_task(&self, task: Task) -> Result<Task, DomainError> {
        let mut store = self.store.write().await;

        if let Some(group_id) = task.group_id {
            if store.owned_group(group_id, task.user_id).is_none() {
                return Err(ResourceError::GroupNotFound.into());
            }
        }

        store.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn mark_task_completed(
        &self,
        task_id: Uuid,
        user_id: Uuid,
    ) -> Result<Task, DomainError> {
        let mut store = self.store.write().await;
        let task = store
            .owned_task_mut(task_id, user_id)
            .ok_or(ResourceError::TaskNotFound)?;
        task.mark_completed(Utc::now());
        Ok(task.clone())
    }

    async fn mark_task_uncompleted(
        &self,
        task_id: Uuid,
        user_id: Uuid,
    ) -> Result<Task, DomainError> {
        let mut store = self.store.write().await;
        let task = store
            .owned_task_mut(task_id, user_id)
            .ok_or(ResourceError::TaskNotFound)?;
        task.mark_uncompleted();
        Ok(task.clone())
    }

    async fn delete_task(&self, task_id: Uuid, user_id: Uuid) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        let task = store
            .owned_task_mut(task_id, user_id)
            .ok_or(ResourceError::TaskNotFound)?;
        task.soft_delete(Utc::now());
        Ok(())
    }
}
