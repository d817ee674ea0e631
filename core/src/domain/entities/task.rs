//! Task entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of a task text
pub const TASK_TEXT_MAX_LENGTH: usize = 200;

/// A to-do item owned by a user, optionally filed under a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub group_id: Option<Uuid>,
    pub text: String,
    pub is_completed: bool,
    pub is_deleted: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        user_id: Uuid,
        text: impl Into<String>,
        group_id: Option<Uuid>,
        due_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            group_id,
            text: text.into(),
            is_completed: false,
            is_deleted: false,
            completed_at: None,
            deleted_at: None,
            due_at,
            created_at: Utc::now(),
        }
    }

    pub fn mark_completed(&mut self, at: DateTime<Utc>) {
        self.is_completed = true;
        self.completed_at = Some(at);
    }

    pub fn mark_uncompleted(&mut self) {
        self.is_completed = false;
        self.completed_at = None;
    }

    pub fn soft_delete(&mut self, at: DateTime<Utc>) {
        self.is_deleted = true;
        self.deleted_at = Some(at);
    }

    /// Not soft-deleted
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}
