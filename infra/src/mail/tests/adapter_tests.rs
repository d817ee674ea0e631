//! Tests for the core trait adapter

use std::sync::Arc;

use tg_core::services::mail::MailServiceTrait;

use crate::mail::{MailServiceAdapter, MockMailService};

#[tokio::test]
async fn test_adapter_forwards_to_provider() {
    let mock = MockMailService::with_options(false, false);
    let adapter = MailServiceAdapter::new(Arc::new(mock.clone()));

    let id = adapter
        .send_email(
            "Verify Your Email",
            &["carol@example.com".to_string()],
            "https://app.example.com/verify-email?token=abc",
        )
        .await
        .unwrap();

    let sent = mock.last_message().unwrap();
    assert_eq!(sent.message_id, id);
    assert_eq!(sent.subject, "Verify Your Email");
    assert!(sent.body.ends_with("token=abc"));
    assert_eq!(adapter.provider_name(), "Mock");
}

#[tokio::test]
async fn test_adapter_flattens_errors_to_strings() {
    let adapter = MailServiceAdapter::new(Arc::new(MockMailService::with_options(false, true)));

    let err = adapter
        .send_email("Subject", &["carol@example.com".to_string()], "Body")
        .await
        .unwrap_err();

    assert!(err.contains("Simulated mail sending failure"));
    assert!(!adapter.is_available().await);
}
