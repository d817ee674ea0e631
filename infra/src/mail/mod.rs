//! Mail Service Module
//!
//! Outgoing mail for verification and password reset links.
//!
//! - **Mail Service Trait**: common interface for all providers
//! - **SMTP**: delivery through lettre
//! - **Mock**: console output and an in-memory outbox for development
//! - **Adapter**: bridges providers to the core `MailServiceTrait`

use std::sync::Arc;

pub mod mail_service;
pub mod mail_trait_adapter;
pub mod mock_mail;
pub mod smtp;

pub use mail_service::{mask_receivers, validate_receivers, MailService};
pub use mail_trait_adapter::MailServiceAdapter;
pub use mock_mail::{MockMailService, OutboxMessage};
pub use smtp::SmtpMailService;

use crate::config::MailConfig;
use crate::InfrastructureError;

#[cfg(test)]
mod tests;

/// Create the mail service the configuration names
///
/// Unknown providers and SMTP setup failures are errors.
pub fn create_mail_service(
    config: &MailConfig,
) -> Result<Arc<dyn MailService>, InfrastructureError> {
    match config.provider.as_str() {
        "mock" => Ok(Arc::new(MockMailService::new())),
        "smtp" => Ok(Arc::new(SmtpMailService::new(config)?)),
        other => Err(InfrastructureError::Config(format!(
            "Unknown mail provider '{}'",
            other
        ))),
    }
}

/// Like [`create_mail_service`], but falls back to the mock service with a
/// warning so a half-configured development machine still starts
pub fn create_mail_service_or_mock(config: &MailConfig) -> Arc<dyn MailService> {
    create_mail_service(config).unwrap_or_else(|e| {
        tracing::error!("Failed to initialize mail service: {}", e);
        tracing::warn!("Falling back to mock mail service");
        Arc::new(MockMailService::new())
    })
}
