//! Mail Service Trait Adapter
//!
//! Implements the core `MailServiceTrait` on top of any infrastructure
//! `MailService`, so the account use cases never see transport errors.

use std::sync::Arc;

use async_trait::async_trait;
use tg_core::services::mail::MailServiceTrait;

use super::mail_service::MailService;

/// Adapter that implements the core MailServiceTrait for any provider
#[derive(Clone)]
pub struct MailServiceAdapter {
    inner: Arc<dyn MailService>,
}

impl std::fmt::Debug for MailServiceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailServiceAdapter")
            .field("provider", &self.inner.provider_name())
            .finish()
    }
}

impl MailServiceAdapter {
    pub fn new(inner: Arc<dyn MailService>) -> Self {
        Self { inner }
    }

    /// Provider behind this adapter
    pub fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }

    /// Delegates to the provider's availability check
    pub async fn is_available(&self) -> bool {
        self.inner.is_available().await
    }
}

#[async_trait]
impl MailServiceTrait for MailServiceAdapter {
    async fn send_email(
        &self,
        subject: &str,
        receivers: &[String],
        message: &str,
    ) -> Result<String, String> {
        self.inner
            .send_mail(receivers, subject, message)
            .await
            .map_err(|e| e.to_string())
    }
}
