//! Mail Service Interface
//!
//! Transport-level trait implemented by the SMTP and mock providers.

use async_trait::async_trait;
use tg_shared::utils::validation::validators::{is_valid_email, mask_email};

use crate::InfrastructureError;

/// Mail service trait for sending plain-text messages
#[async_trait]
pub trait MailService: Send + Sync {
    /// Send a plain-text message to every receiver
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Identifier of the accepted message
    /// * `Err(InfrastructureError)` - If building or sending fails
    async fn send_mail(
        &self,
        receivers: &[String],
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError>;

    /// Provider name for logs ("SMTP", "Mock")
    fn provider_name(&self) -> &str;

    /// Check if the service can currently deliver
    async fn is_available(&self) -> bool {
        true
    }
}

/// Reject an empty or malformed receiver list before any transport work
pub fn validate_receivers(receivers: &[String]) -> Result<(), InfrastructureError> {
    if receivers.is_empty() {
        return Err(InfrastructureError::Mail("No receivers given".to_string()));
    }
    if let Some(bad) = receivers.iter().find(|r| !is_valid_email(r)) {
        return Err(InfrastructureError::Mail(format!(
            "Invalid receiver address: {}",
            mask_email(bad)
        )));
    }
    Ok(())
}

/// Masked, comma-separated receivers for log fields
pub fn mask_receivers(receivers: &[String]) -> String {
    receivers
        .iter()
        .map(|r| mask_email(r))
        .collect::<Vec<_>>()
        .join(", ")
}
