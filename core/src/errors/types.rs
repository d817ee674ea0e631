//! Domain-specific error types for accounts, tokens, validation and owned resources
//!
//! Every variant maps to a stable message key through `code()`. Callers and
//! tests match on the variant or the key, never on the display text.

use thiserror::Error;

/// Account and credential errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("User not found.")]
    UserNotFound,

    #[error("Username is already taken.")]
    UsernameAlreadyExists,

    #[error("Email address is already registered.")]
    EmailAlreadyExists,

    #[error("Email not found.")]
    EmailNotFound,

    #[error("Invalid login credentials.")]
    InvalidCredentials,

    #[error("No verified email associated with this account.")]
    EmailNotVerified,

    #[error("Email address is already verified.")]
    EmailAlreadyVerified,

    #[error("No active primary email found for this account.")]
    NoActivePrimaryEmail,

    #[error("Exactly one primary email is required.")]
    PrimaryEmailRequired,
}

impl AuthError {
    /// Stable message key
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::UsernameAlreadyExists => "USERNAME_ALREADY_EXISTS",
            AuthError::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            AuthError::EmailNotFound => "EMAIL_NOT_FOUND",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::EmailNotVerified => "EMAIL_NOT_VERIFIED",
            AuthError::EmailAlreadyVerified => "EMAIL_ALREADY_VERIFIED",
            AuthError::NoActivePrimaryEmail => "NO_ACTIVE_PRIMARY_EMAIL",
            AuthError::PrimaryEmailRequired => "PRIMARY_EMAIL_REQUIRED",
        }
    }
}

/// Verification and reset token errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is invalid or has expired.")]
    InvalidOrExpired,

    #[error("Invalid token type.")]
    InvalidTokenType,

    #[error("Token is required.")]
    MissingInput,

    #[error("Token data is missing or invalid.")]
    MissingTokenData,

    #[error("Failed to generate token.")]
    GenerationFailed,

    #[error("Password reset token not found.")]
    TokenNotFound,

    #[error("No verification token found for this email.")]
    VerificationTokenNotFound,

    #[error("Token has already been used.")]
    TokenAlreadyUsed,

    #[error("Verification token does not match the stored record.")]
    TokenMismatch,
}

impl TokenError {
    /// Stable message key
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::InvalidOrExpired => "INVALID_OR_EXPIRED_TOKEN",
            TokenError::InvalidTokenType => "INVALID_TOKEN_TYPE",
            TokenError::MissingInput => "MISSING_TOKEN",
            TokenError::MissingTokenData => "MISSING_TOKEN_DATA",
            TokenError::GenerationFailed => "TOKEN_GENERATION_FAILED",
            TokenError::TokenNotFound => "TOKEN_NOT_FOUND",
            TokenError::VerificationTokenNotFound => "VERIFICATION_TOKEN_NOT_FOUND",
            TokenError::TokenAlreadyUsed => "TOKEN_ALREADY_USED",
            TokenError::TokenMismatch => "TOKEN_MISMATCH",
        }
    }
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field required: {field}")]
    RequiredField { field: String },

    #[error("All fields (username, email, password) are required.")]
    AllFieldsRequired,

    #[error("Password must be at least {min} characters long.")]
    InvalidPasswordLength { min: usize },

    #[error("Valid password and hashed password are required.")]
    InvalidPasswordInputs,

    #[error("New password must be at least {min} characters long.")]
    InvalidNewPassword { min: usize },

    #[error("New username must be at least {min} characters long.")]
    InvalidNewUsername { min: usize },

    #[error("Field {field} must be at most {max} characters long.")]
    InvalidLength { field: String, max: usize },

    #[error("Invalid email address.")]
    InvalidEmail,
}

impl ValidationError {
    /// Shorthand for a missing required field
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::RequiredField { field: field.into() }
    }

    /// Stable message key
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::RequiredField { .. } => "MISSING_FIELDS",
            ValidationError::AllFieldsRequired => "ALL_FIELDS_REQUIRED",
            ValidationError::InvalidPasswordLength { .. } => "INVALID_PASSWORD_LENGTH",
            ValidationError::InvalidPasswordInputs => "INVALID_PASSWORD_INPUTS",
            ValidationError::InvalidNewPassword { .. } => "INVALID_NEW_PASSWORD",
            ValidationError::InvalidNewUsername { .. } => "INVALID_NEW_USERNAME",
            ValidationError::InvalidLength { .. } => "INVALID_LENGTH",
            ValidationError::InvalidEmail => "INVALID_EMAIL",
        }
    }
}

/// Errors on user-owned resources (groups and tasks)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("Group not found.")]
    GroupNotFound,

    #[error("Task not found.")]
    TaskNotFound,

    #[error("You do not have access to this resource.")]
    PermissionDenied,
}

impl ResourceError {
    /// Stable message key
    pub fn code(&self) -> &'static str {
        match self {
            ResourceError::GroupNotFound => "GROUP_NOT_FOUND",
            ResourceError::TaskNotFound => "TASK_NOT_FOUND",
            ResourceError::PermissionDenied => "PERMISSION_DENIED",
        }
    }
}

/// Unexpected storage failure
///
/// Carries the underlying cause as its `source()`; the message is for logs
/// and is never shown to API clients.
#[derive(Error, Debug)]
#[error("Repository error: {message}")]
pub struct RepositoryError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl RepositoryError {
    /// Create a repository error without an underlying cause
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a repository error wrapping the original cause
    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Description of the failed operation
    pub fn message(&self) -> &str {
        &self.message
    }
}
