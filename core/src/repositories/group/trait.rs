//! Group repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::group::Group;
use crate::errors::DomainError;

/// Repository trait for Group persistence operations
///
/// Like tasks, groups are filtered by `(id, user_id, is_deleted = false)` in
/// every operation. Groups returned with tasks carry only active tasks,
/// oldest first.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Active groups of a user, newest first, without tasks
    async fn get_groups(&self, user_id: Uuid) -> Result<Vec<Group>, DomainError>;

    /// One group with its active tasks
    ///
    /// # Errors
    /// * `ResourceError::GroupNotFound` - missing, deleted or owned by someone else
    async fn get_group(&self, group_id: Uuid, user_id: Uuid) -> Result<Group, DomainError>;

    /// Groups having at least one active, uncompleted task, newest first
    async fn get_groups_uncomplete(&self, user_id: Uuid) -> Result<Vec<Group>, DomainError>;

    /// Groups with no active uncompleted task (empty groups included), newest first
    async fn get_groups_complete(&self, user_id: Uuid) -> Result<Vec<Group>, DomainError>;

    /// Persist a new group
    async fn create_group(&self, group: Group) -> Result<Group, DomainError>;

    /// Replace name and description, touching `updated_at`
    async fn update_group(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Group, DomainError>;

    /// Soft-delete a group and all of its tasks in one atomic unit
    async fn delete_group(&self, group_id: Uuid, user_id: Uuid) -> Result<(), DomainError>;
}
