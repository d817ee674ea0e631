//! # TaskGroup Core
//!
//! Core business logic and domain layer for the TaskGroup backend.
//! This crate contains domain entities, the credential hasher, the one-time
//! token service, repository interfaces and the use-case services that
//! orchestrate them.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod errors;

// Re-export commonly used types for convenience
pub use domain::entities::{
    Email, GeneratedToken, Group, PasswordResetToken, Task, TokenClaims, TokenType, User,
    VerifiedEmailToken,
};
pub use errors::*;
pub use repositories::{GroupRepository, TaskRepository, UserRepository};
pub use services::{
    AccountService, AccountServiceConfig, EmailVerified, GroupService, MailServiceTrait,
    PasswordHasher, PasswordHasherConfig, PasswordResetIssued, TaskService, TokenService,
    TokenServiceConfig,
};
