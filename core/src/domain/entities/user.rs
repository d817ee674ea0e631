//! User and Email entities representing a registered account in the TaskGroup system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of a username
pub const USERNAME_MAX_LENGTH: usize = 50;

/// Email address owned by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    /// Unique identifier for the email
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// The address itself, unique among non-deleted emails
    pub address: String,

    /// Whether this is the account's primary (recovery and login) address
    pub is_primary: bool,

    /// Soft-delete flag
    pub is_deleted: bool,

    /// Timestamp when the email was soft-deleted
    pub deleted_at: Option<DateTime<Utc>>,

    /// Timestamp when ownership of the address was confirmed
    pub verified_at: Option<DateTime<Utc>>,

    /// Timestamp when the email was added
    pub created_at: DateTime<Utc>,
}

impl Email {
    /// Creates a new, unverified email for a user
    pub fn new(user_id: Uuid, address: impl Into<String>, is_primary: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            address: address.into(),
            is_primary,
            is_deleted: false,
            deleted_at: None,
            verified_at: None,
            created_at: Utc::now(),
        }
    }

    /// Whether the address has been confirmed
    pub fn is_verified(&self) -> bool {
        self.verified_at.is_some()
    }

    /// Whether the email is not soft-deleted
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// Records a successful confirmation
    pub fn mark_verified(&mut self, at: DateTime<Utc>) {
        self.verified_at = Some(at);
    }

    /// Soft-deletes the email
    pub fn soft_delete(&mut self, at: DateTime<Utc>) {
        self.is_deleted = true;
        self.deleted_at = Some(at);
    }
}

/// User entity representing a registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Unique login name
    pub username: String,

    /// bcrypt hash of the peppered password
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Non-deleted emails of the user
    pub emails: Vec<Email>,
}

impl User {
    /// Creates a new user owning exactly one primary, unverified email
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        primary_email: impl Into<String>,
    ) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            username: username.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
            emails: vec![Email::new(id, primary_email, true)],
        }
    }

    /// The active primary email, if any
    pub fn primary_email(&self) -> Option<&Email> {
        self.emails.iter().find(|e| e.is_primary && e.is_active())
    }

    /// Number of active primary emails attached to the user
    pub fn active_primary_count(&self) -> usize {
        self.emails
            .iter()
            .filter(|e| e.is_primary && e.is_active())
            .count()
    }

    /// Finds an attached email by address
    pub fn find_email(&self, address: &str) -> Option<&Email> {
        self.emails.iter().find(|e| e.address == address)
    }
}
