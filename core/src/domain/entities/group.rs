//! Group entity collecting a user's tasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::Task;

/// Maximum length of a group name
pub const GROUP_NAME_MAX_LENGTH: usize = 100;

/// Maximum length of a group description
pub const GROUP_DESCRIPTION_MAX_LENGTH: usize = 500;

/// Named collection of tasks owned by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Active tasks of the group; empty unless the query loads them
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Group {
    pub fn new(user_id: Uuid, name: impl Into<String>, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            description,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
            tasks: Vec::new(),
        }
    }

    /// Replaces name and description
    pub fn update(&mut self, name: impl Into<String>, description: Option<String>) {
        self.name = name.into();
        self.description = description;
        self.updated_at = Utc::now();
    }

    pub fn soft_delete(&mut self, at: DateTime<Utc>) {
        self.is_deleted = true;
        self.deleted_at = Some(at);
    }

    /// Whether at least one loaded active task is still open
    pub fn has_uncompleted_tasks(&self) -> bool {
        self.tasks
            .iter()
            .any(|t| t.is_active() && !t.is_completed)
    }
}
