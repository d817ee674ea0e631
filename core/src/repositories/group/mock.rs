//! Mock implementation of GroupRepository for testing

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::group::Group;
use crate::errors::{DomainError, ResourceError};
use crate::repositories::task::mock::{MockTaskRepository, TaskGroupStore};

use super::trait_::GroupRepository;

/// Mock group repository for testing
///
/// Shares its tables with the task repository returned by
/// [`MockGroupRepository::task_repository`], so cascades and group checks
/// see the same data.
pub struct MockGroupRepository {
    store: Arc<RwLock<TaskGroupStore>>,
}

impl MockGroupRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(TaskGroupStore::default())),
        }
    }

    /// Task repository backed by the same tables
    pub fn task_repository(&self) -> MockTaskRepository {
        MockTaskRepository::with_store(Arc::clone(&self.store))
    }

    /// Active groups of a user with their tasks, newest first
    async fn groups_with_tasks(&self, user_id: Uuid) -> Vec<Group> {
        let store = self.store.read().await;
        let mut groups: Vec<Group> = store
            .groups
            .values()
            .filter(|g| g.user_id == user_id && !g.is_deleted)
            .map(|g| Group {
                tasks: store.group_tasks(g.id),
                ..g.clone()
            })
            .collect();
        groups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        groups
    }
}

impl Default for MockGroupRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GroupRepository for MockGroupRepository {
    async fn get_groups(&self, user_id: Uuid) -> Result<Vec<Group>, DomainError> {
        let store = self.store.read().await;
        let mut groups: Vec<Group> = store
            .groups
            .values()
            .filter(|g| g.user_id == user_id && !g.is_deleted)
            .cloned()
            .collect();
        groups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(groups)
    }

    async fn get_group(&self, group_id: Uuid, user_id: Uuid) -> Result<Group, DomainError> {
        let store = self.store.read().await;
        let group = store
            .owned_group(group_id, user_id)
            .ok_or(ResourceError::GroupNotFound)?;
        Ok(Group {
            tasks: store.group_tasks(group.id),
            ..group.clone()
        })
    }

    async fn get_groups_uncomplete(&self, user_id: Uuid) -> Result<Vec<Group>, DomainError> {
        let mut groups = self.groups_with_tasks(user_id).await;
        groups.retain(|g| g.has_uncompleted_tasks());
        Ok(groups)
    }

    async fn get_groups_complete(&self, user_id: Uuid) -> Result<Vec<Group>, DomainError> {
        let mut groups = self.groups_with_tasks(user_id).await;
        groups.retain(|g| !g.has_uncompleted_tasks());
        Ok(groups)
    }

    async fn create_group(&self, group: Group) -> Result<Group, DomainError> {
        let mut store = self.store.write().await;
        store.groups.insert(group.id, group.clone());
        Ok(group)
    }

    async fn update_group(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Group, DomainError> {
        let mut store = self.store.write().await;
        let group = store
            .groups
            .get_mut(&group_id)
            .filter(|g| g.user_id == user_id && !g.is_deleted)
            .ok_or(ResourceError::GroupNotFound)?;
        group.update(name, description.map(str::to_string));
        Ok(group.clone())
    }

    async fn delete_group(&self, group_id: Uuid, user_id: Uuid) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        if store.owned_group(group_id, user_id).is_none() {
            return Err(ResourceError::GroupNotFound.into());
        }

        let now = Utc::now();
        for task in store
            .tasks
            .values_mut()
            .filter(|t| t.group_id == Some(group_id) && t.is_active())
        {
            task.soft_delete(now);
        }
        if let Some(group) = store.groups.get_mut(&group_id) {
            group.soft_delete(now);
        }
        Ok(())
    }
}
