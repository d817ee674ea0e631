//! One-time token service
//!
//! Mints signed, typed, expiring tokens for the email-verification and
//! password-reset workflows, and derives the digest that is stored in place
//! of the raw token.

mod config;
mod service;


pub use config::TokenServiceConfig;
pub use service::TokenService;
