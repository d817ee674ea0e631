//! Domain-specific error types and error handling.

mod types;


// Re-export all error types
pub use types::{AuthError, RepositoryError, ResourceError, TokenError, ValidationError};

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Failed to send email.")]
    MailDelivery { reason: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Coarse classification used by the transport layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed input, failed precondition
    Validation,
    /// Wrong username/password pair
    Unauthorized,
    /// Caller may not perform the action
    Permission,
    /// Target missing or already soft-deleted
    NotFound,
    /// An external collaborator (mail) failed
    Unavailable,
    /// Storage or other unexpected failure
    Internal,
}

impl DomainError {
    /// Stable message key of this error
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::MailDelivery { .. } => "EMAIL_SEND_FAILED",
            DomainError::Internal { .. } => "INTERNAL_ERROR",
            DomainError::Auth(e) => e.code(),
            DomainError::Token(e) => e.code(),
            DomainError::Validation(e) => e.code(),
            DomainError::Resource(e) => e.code(),
            DomainError::Repository(_) => "REPOSITORY_ERROR",
        }
    }

    /// Classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::MailDelivery { .. } => ErrorKind::Unavailable,
            DomainError::Internal { .. } | DomainError::Repository(_) => ErrorKind::Internal,
            DomainError::Validation(_) => ErrorKind::Validation,
            DomainError::Auth(e) => match e {
                AuthError::UserNotFound | AuthError::EmailNotFound => ErrorKind::NotFound,
                AuthError::InvalidCredentials => ErrorKind::Unauthorized,
                AuthError::EmailNotVerified | AuthError::NoActivePrimaryEmail => {
                    ErrorKind::Permission
                }
                AuthError::UsernameAlreadyExists
                | AuthError::EmailAlreadyExists
                | AuthError::EmailAlreadyVerified
                | AuthError::PrimaryEmailRequired => ErrorKind::Validation,
            },
            DomainError::Token(e) => match e {
                TokenError::TokenNotFound | TokenError::VerificationTokenNotFound => {
                    ErrorKind::NotFound
                }
                TokenError::GenerationFailed => ErrorKind::Internal,
                _ => ErrorKind::Validation,
            },
            DomainError::Resource(e) => match e {
                ResourceError::GroupNotFound | ResourceError::TaskNotFound => ErrorKind::NotFound,
                ResourceError::PermissionDenied => ErrorKind::Permission,
            },
        }
    }

    /// Message safe to show to API clients
    ///
    /// Internal failures are reduced to a generic sentence; their details
    /// stay in the logs.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Internal => "An internal error occurred.".to_string(),
            _ => self.to_string(),
        }
    }
}
