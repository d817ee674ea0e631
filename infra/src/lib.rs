//! # Infrastructure Layer
//!
//! Concrete implementations behind the TaskGroup core ports:
//! - **Database**: MySQL repositories for users, tasks and groups using SQLx
//! - **Mail**: SMTP delivery through lettre, plus a mock transport for development
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

use std::path::PathBuf;

use tg_core::errors::{DomainError, RepositoryError};

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Mail delivery module
pub mod mail;

/// Configuration types consumed by this crate
pub mod config {
    pub use tg_shared::config::{DatabaseConfig, MailConfig};
}

/// Load `.env` into the process environment, if present
///
/// Binaries call this before reading [`tg_shared::AppConfig`], which is
/// also before any subscriber exists, so the outcome is returned for the
/// caller to log once tracing is up.
pub fn load_dotenv() -> Result<Option<PathBuf>, InfrastructureError> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(InfrastructureError::Config(format!("Unreadable .env file: {}", e))),
    }
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection or query error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failure
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Mail transport error
    #[error("Mail service error: {0}")]
    Mail(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        let message = err.to_string();
        DomainError::Repository(RepositoryError::with_source(message, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tg_core::errors::ErrorKind;

    #[test]
    fn test_infrastructure_error_becomes_internal_domain_error() {
        let err: DomainError = InfrastructureError::Config("bad url".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.code(), "REPOSITORY_ERROR");
        assert!(err.to_string().contains("bad url"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
