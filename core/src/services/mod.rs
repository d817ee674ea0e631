//! Business services containing domain logic and use cases.

pub mod account;
pub mod group;
pub mod mail;
pub mod password;
pub mod task;
pub mod token;

// Re-export commonly used types
pub use account::{AccountService, AccountServiceConfig, EmailVerified, PasswordResetIssued};
pub use group::GroupService;
pub use mail::MailServiceTrait;
pub use password::{PasswordHasher, PasswordHasherConfig};
pub use task::TaskService;
pub use token::{TokenService, TokenServiceConfig};
