//! SMTP mail delivery through lettre
//!
//! lettre's `SmtpTransport` is blocking, so every send runs on the blocking
//! thread pool. There is no retry: a failed send is reported to the caller.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::transport::smtp::PoolConfig;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::MailConfig;
use crate::InfrastructureError;

use super::mail_service::{mask_receivers, validate_receivers, MailService};

/// Implicit-TLS submission port; every other port upgrades with STARTTLS
const SMTPS_PORT: u16 = 465;

/// SMTP-backed mail service
#[derive(Clone)]
pub struct SmtpMailService {
    transport: SmtpTransport,
    from: Mailbox,
    message_id_domain: String,
}

impl SmtpMailService {
    /// Build the transport from configuration; no connection is opened yet
    pub fn new(config: &MailConfig) -> Result<Self, InfrastructureError> {
        if config.host.is_empty() {
            return Err(InfrastructureError::Config("mail.host is empty".to_string()));
        }

        let from: Mailbox = config
            .sender()
            .parse()
            .map_err(|e| InfrastructureError::Config(format!("Invalid sender address: {}", e)))?;

        let tls_parameters = TlsParameters::builder(config.host.clone())
            .build()
            .map_err(|e| InfrastructureError::Config(format!("Failed to build TLS parameters: {}", e)))?;
        let tls = if config.port == SMTPS_PORT {
            Tls::Wrapper(tls_parameters)
        } else {
            Tls::Required(tls_parameters)
        };

        let transport = SmtpTransport::relay(&config.host)
            .map_err(|e| InfrastructureError::Config(format!("Failed to create SMTP transport: {}", e)))?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .port(config.port)
            .tls(tls)
            .pool_config(PoolConfig::new().max_size(4))
            .timeout(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        let message_id_domain = from.email.domain().to_string();

        info!(
            host = %config.host,
            port = config.port,
            "SMTP mail service configured"
        );

        Ok(Self {
            transport,
            from,
            message_id_domain,
        })
    }

    fn build_message(
        &self,
        message_id: &str,
        receivers: &[String],
        subject: &str,
        body: &str,
    ) -> Result<Message, InfrastructureError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(subject)
            .message_id(Some(message_id.to_string()))
            .header(ContentType::TEXT_PLAIN);

        for receiver in receivers {
            let mailbox: Mailbox = receiver
                .parse()
                .map_err(|e| InfrastructureError::Mail(format!("Invalid receiver address: {}", e)))?;
            builder = builder.to(mailbox);
        }

        builder
            .body(body.to_string())
            .map_err(|e| InfrastructureError::Mail(format!("Failed to create email: {}", e)))
    }
}

#[async_trait]
impl MailService for SmtpMailService {
    async fn send_mail(
        &self,
        receivers: &[String],
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError> {
        validate_receivers(receivers)?;

        let message_id = format!("<{}@{}>", Uuid::new_v4(), self.message_id_domain);
        let message = self.build_message(&message_id, receivers, subject, body)?;

        let transport = self.transport.clone();
        let outcome = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| InfrastructureError::General(format!("Mail task failed: {}", e)))?;

        match outcome {
            Ok(_) => {
                info!(
                    target: "mail_service",
                    provider = "smtp",
                    receivers = %mask_receivers(receivers),
                    message_id = %message_id,
                    "Email sent"
                );
                Ok(message_id)
            }
            Err(e) => {
                warn!(
                    target: "mail_service",
                    provider = "smtp",
                    receivers = %mask_receivers(receivers),
                    error = %e,
                    "Email delivery failed"
                );
                Err(InfrastructureError::Mail(format!("Failed to send email: {}", e)))
            }
        }
    }

    fn provider_name(&self) -> &str {
        "SMTP"
    }

    async fn is_available(&self) -> bool {
        let transport = self.transport.clone();
        matches!(
            tokio::task::spawn_blocking(move || transport.test_connection()).await,
            Ok(Ok(true))
        )
    }
}
