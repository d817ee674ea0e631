//! User repository trait defining the interface for account persistence.
//!
//! Covers users, their emails, and the two kinds of one-time tokens bound
//! to them. Storage failures surface as `DomainError::Repository`; missing
//! rows, duplicates and broken preconditions surface as typed domain errors
//! so callers can tell bad input from a broken store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::token::{PasswordResetToken, VerifiedEmailToken};
use crate::domain::entities::user::{Email, User};
use crate::errors::DomainError;

/// Repository trait for User, Email and token persistence operations
///
/// # Example Implementation
/// ```no_run
/// use tg_core::domain::entities::user::User;
/// use tg_core::errors::{AuthError, DomainError};
///
/// struct MySqlUserRepository {
///     // database connection pool
/// }
///
/// impl MySqlUserRepository {
///     async fn get_user(&self, username: &str) -> Result<User, DomainError> {
///         // SELECT ... WHERE username = ?
///         Err(AuthError::UserNotFound.into())
///     }
/// }
/// ```
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user together with its attached emails
    ///
    /// All checks and inserts run in one atomic unit; on any failure no
    /// user or email row remains.
    ///
    /// # Errors
    /// * `AuthError::UsernameAlreadyExists` - username taken
    /// * `AuthError::EmailAlreadyExists` - an attached address is already in use
    /// * `AuthError::PrimaryEmailRequired` - not exactly one active primary email
    async fn create_user(&self, user: User) -> Result<User, DomainError>;

    /// Find a user by username, hydrated with its non-deleted emails
    ///
    /// # Errors
    /// * `AuthError::UserNotFound` - no such user
    async fn get_user(&self, username: &str) -> Result<User, DomainError>;

    /// Find a user by id, hydrated with its non-deleted emails
    async fn get_user_by_id(&self, user_id: Uuid) -> Result<User, DomainError>;

    /// Replace the stored password hash
    async fn update_password(&self, user_id: Uuid, password_hash: &str)
        -> Result<(), DomainError>;

    /// Rename a user
    ///
    /// # Errors
    /// * `AuthError::UserNotFound` - `current` does not exist
    /// * `AuthError::UsernameAlreadyExists` - `new` is taken
    async fn update_username(&self, current: &str, new: &str) -> Result<User, DomainError>;

    /// Attach an additional email to an existing user
    async fn create_email(&self, email: Email) -> Result<Email, DomainError>;

    /// Soft-delete an email owned by `user_id`
    ///
    /// The primary email cannot be deleted (`AuthError::PrimaryEmailRequired`).
    async fn delete_email(&self, email_id: Uuid, user_id: Uuid) -> Result<(), DomainError>;

    /// Find a non-deleted email by address
    async fn get_email(&self, address: &str) -> Result<Email, DomainError>;

    /// Find a non-deleted, verified email by address
    ///
    /// # Errors
    /// * `AuthError::EmailNotVerified` - absent or not yet confirmed
    async fn get_verified_email(&self, address: &str) -> Result<Email, DomainError>;

    /// Insert a verification token; several outstanding tokens may coexist
    async fn create_verified_email_token(
        &self,
        token: VerifiedEmailToken,
    ) -> Result<VerifiedEmailToken, DomainError>;

    /// Newest unused, unexpired verification token for an address
    ///
    /// # Errors
    /// * `TokenError::VerificationTokenNotFound` - nothing qualifies
    async fn get_verified_email_token(
        &self,
        address: &str,
    ) -> Result<VerifiedEmailToken, DomainError>;

    /// Consume the token and mark the email verified, atomically
    ///
    /// The token flip is a conditional update that succeeds at most once.
    ///
    /// # Errors
    /// * `TokenError::TokenAlreadyUsed` - token was consumed already
    /// * `TokenError::VerificationTokenNotFound` - token missing
    /// * `AuthError::EmailNotFound` - email missing or deleted
    async fn confirm_email(&self, email_id: Uuid, token_id: Uuid) -> Result<(), DomainError>;

    /// Invalidate an unused verification token without consuming it
    async fn revoke_verified_email_token(&self, token_id: Uuid) -> Result<(), DomainError>;

    /// Insert a password reset token
    async fn create_password_reset_token(
        &self,
        token: PasswordResetToken,
    ) -> Result<PasswordResetToken, DomainError>;

    /// Newest unused, unexpired reset token with the given hash
    ///
    /// # Errors
    /// * `TokenError::TokenAlreadyUsed` - matching rows exist but all are consumed
    /// * `TokenError::TokenNotFound` - nothing matches
    async fn get_password_reset_token(
        &self,
        token_hash: &str,
    ) -> Result<PasswordResetToken, DomainError>;

    /// Consume a reset token; succeeds at most once per token
    async fn confirm_password_reset_token(&self, token_id: Uuid) -> Result<(), DomainError>;

    /// Invalidate an unused reset token without consuming it
    async fn revoke_password_reset_token(&self, token_id: Uuid) -> Result<(), DomainError>;
}
