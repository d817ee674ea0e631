//! Account service module
//!
//! Registration, login, email verification, password reset and username
//! changes. Tokens are minted by the token service, persisted through the
//! user repository and delivered through the mail capability.

mod config;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use config::AccountServiceConfig;
pub use service::AccountService;
pub use types::{EmailVerified, PasswordResetIssued};
