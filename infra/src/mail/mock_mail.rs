//! Mock Mail Service Implementation
//!
//! Logs messages instead of sending them and keeps an outbox for tests and
//! local development, where the verification and reset links can be copied
//! from the console.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use super::mail_service::{mask_receivers, validate_receivers, MailService};
use crate::InfrastructureError;

/// A message accepted by the mock transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxMessage {
    pub message_id: String,
    pub receivers: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Mock mail service for development and testing
#[derive(Clone)]
pub struct MockMailService {
    message_count: Arc<AtomicU64>,
    outbox: Arc<Mutex<Vec<OutboxMessage>>>,
    simulate_failure: bool,
    console_output: bool,
}

impl MockMailService {
    /// Create a new mock mail service that echoes messages to the console
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    /// Create a mock service with configurable options
    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            outbox: Arc::new(Mutex::new(Vec::new())),
            simulate_failure,
            console_output,
        }
    }

    /// Total number of messages accepted
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Copy of every accepted message, oldest first
    pub fn outbox(&self) -> Vec<OutboxMessage> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }

    /// Most recently accepted message
    pub fn last_message(&self) -> Option<OutboxMessage> {
        self.outbox
            .lock()
            .ok()
            .and_then(|outbox| outbox.last().cloned())
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&mut self, simulate: bool) {
        self.simulate_failure = simulate;
    }
}

impl Default for MockMailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MailService for MockMailService {
    async fn send_mail(
        &self,
        receivers: &[String],
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError> {
        validate_receivers(receivers)?;

        if self.simulate_failure {
            warn!(
                "Mock mail service simulating failure for: {}",
                mask_receivers(receivers)
            );
            return Err(InfrastructureError::Mail(
                "Simulated mail sending failure".to_string(),
            ));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("MOCK MAIL SERVICE - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("To: {}", receivers.join(", "));
            println!("Subject: {}", subject);
            println!("Message ID: {}", message_id);
            println!("{}", body);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            target: "mail_service",
            provider = "mock",
            receivers = %mask_receivers(receivers),
            message_id = %message_id,
            subject = subject,
            "Email sent (mock)"
        );

        if let Ok(mut outbox) = self.outbox.lock() {
            outbox.push(OutboxMessage {
                message_id: message_id.clone(),
                receivers: receivers.to_vec(),
                subject: subject.to_string(),
                body: body.to_string(),
            });
        }

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }

    async fn is_available(&self) -> bool {
        !self.simulate_failure
    }
}
