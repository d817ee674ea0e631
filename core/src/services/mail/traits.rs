//! Trait for mail delivery integration

use async_trait::async_trait;

/// Trait for mail service integration
///
/// Delivery is synchronous from the caller's point of view: success means
/// the message was accepted by the transport, nothing more.
#[async_trait]
pub trait MailServiceTrait: Send + Sync {
    /// Send a plain-text message, returning a delivery id
    async fn send_email(
        &self,
        subject: &str,
        receivers: &[String],
        message: &str,
    ) -> Result<String, String>;
}
