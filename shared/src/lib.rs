//! Shared utilities and common types for the TaskGroup server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error response structures and error codes
//! - Input validators
//! - Health check response types

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, DatabaseConfig, Environment, LogFormat, LoggingConfig, MailConfig,
    ServerConfig,
};
pub use errors::{error_codes, ApiResult, ErrorResponse};
pub use types::{HealthResponse, HealthStatus, ServiceHealth};
pub use utils::validation;
