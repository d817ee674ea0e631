//! Tests for the SMTP service that need no server

use crate::config::MailConfig;
use crate::mail::{MailService, SmtpMailService};
use crate::InfrastructureError;

fn config() -> MailConfig {
    MailConfig {
        provider: "smtp".to_string(),
        host: "smtp.example.com".to_string(),
        ..MailConfig::default()
    }
}

#[test]
fn test_rejects_invalid_sender() {
    let config = MailConfig {
        username: "not an address".to_string(),
        ..config()
    };
    assert!(matches!(
        SmtpMailService::new(&config),
        Err(InfrastructureError::Config(_))
    ));
}

#[tokio::test]
async fn test_invalid_receivers_fail_before_connecting() {
    let service = SmtpMailService::new(&config()).unwrap();

    let result = service
        .send_mail(&["nobody".to_string()], "Subject", "Body")
        .await;
    assert!(matches!(result, Err(InfrastructureError::Mail(_))));
}

#[tokio::test]
#[ignore] // Requires a reachable SMTP relay configured through MAIL_* variables
async fn test_send_through_configured_relay() {
    let config = MailConfig::from_env();
    let service = SmtpMailService::new(&config).unwrap();
    let receiver = std::env::var("MAIL_TEST_RECEIVER").unwrap();

    let id = service
        .send_mail(&[receiver], "TaskGroup SMTP test", "It works.")
        .await
        .unwrap();
    assert!(id.starts_with('<'));
}
