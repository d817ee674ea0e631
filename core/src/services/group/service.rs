use std::sync::Arc;

use tg_shared::utils::validation::validators::{char_len, not_empty};
use uuid::Uuid;

use crate::domain::entities::group::{Group, GROUP_DESCRIPTION_MAX_LENGTH, GROUP_NAME_MAX_LENGTH};
use crate::errors::{DomainResult, ValidationError};
use crate::repositories::GroupRepository;

/// Group use cases
pub struct GroupService<G: GroupRepository> {
    group_repository: Arc<G>,
}

impl<G: GroupRepository> GroupService<G> {
    pub fn new(group_repository: Arc<G>) -> Self {
        Self { group_repository }
    }

    pub async fn create_group(
        &self,
        user_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> DomainResult<Group> {
        require_user(user_id)?;
        let (name, description) = validate_fields(name, description)?;

        let group = self
            .group_repository
            .create_group(Group::new(user_id, name, description.map(str::to_string)))
            .await?;
        tracing::debug!(event = "group_created", group_id = %group.id, user_id = %user_id);
        Ok(group)
    }

    /// Groups without their tasks, newest first
    pub async fn get_groups(&self, user_id: Uuid) -> DomainResult<Vec<Group>> {
        require_user(user_id)?;
        self.group_repository.get_groups(user_id).await
    }

    pub async fn get_group(&self, group_id: Uuid, user_id: Uuid) -> DomainResult<Group> {
        require_user(user_id)?;
        self.group_repository.get_group(group_id, user_id).await
    }

    /// Groups with no open task left
    pub async fn get_completed_groups(&self, user_id: Uuid) -> DomainResult<Vec<Group>> {
        require_user(user_id)?;
        self.group_repository.get_groups_complete(user_id).await
    }

    /// Groups with at least one open task
    pub async fn get_uncompleted_groups(&self, user_id: Uuid) -> DomainResult<Vec<Group>> {
        require_user(user_id)?;
        self.group_repository.get_groups_uncomplete(user_id).await
    }

    pub async fn update_group(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> DomainResult<Group> {
        require_user(user_id)?;
        let (name, description) = validate_fields(name, description)?;

        self.group_repository
            .update_group(group_id, user_id, name, description)
            .await
    }

    /// Soft-deletes the group and every task in it
    pub async fn delete_group(&self, group_id: Uuid, user_id: Uuid) -> DomainResult<()> {
        require_user(user_id)?;
        self.group_repository.delete_group(group_id, user_id).await?;
        tracing::info!(event = "group_deleted", group_id = %group_id, user_id = %user_id, "Group and its tasks deleted");
        Ok(())
    }
}

fn require_user(user_id: Uuid) -> Result<(), ValidationError> {
    if user_id.is_nil() {
        return Err(ValidationError::required("user_id"));
    }
    Ok(())
}

/// Trimmed name and description, with blank descriptions dropped
fn validate_fields<'a>(
    name: &'a str,
    description: Option<&'a str>,
) -> Result<(&'a str, Option<&'a str>), ValidationError> {
    if !not_empty(name) {
        return Err(ValidationError::required("name"));
    }
    let name = name.trim();
    if char_len(name) > GROUP_NAME_MAX_LENGTH {
        return Err(ValidationError::InvalidLength {
            field: "name".to_string(),
            max: GROUP_NAME_MAX_LENGTH,
        });
    }

    let description = description.map(str::trim).filter(|d| !d.is_empty());
    if let Some(d) = description {
        if char_len(d) > GROUP_DESCRIPTION_MAX_LENGTH {
            return Err(ValidationError::InvalidLength {
                field: "description".to_string(),
                max: GROUP_DESCRIPTION_MAX_LENGTH,
            });
        }
    }
    Ok((name, description))
}
