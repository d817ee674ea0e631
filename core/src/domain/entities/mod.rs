//! Domain entities representing core business objects.

pub mod group;
pub mod task;
pub mod token;
pub mod user;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use group::{Group, GROUP_DESCRIPTION_MAX_LENGTH, GROUP_NAME_MAX_LENGTH};
pub use task::{Task, TASK_TEXT_MAX_LENGTH};
pub use token::{
    GeneratedToken, PasswordResetToken, TokenClaims, TokenType, VerifiedEmailToken,
};
pub use user::{Email, User, USERNAME_MAX_LENGTH};
