//! Mock mail service and harness for testing the account service

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::repositories::MockUserRepository;
use crate::services::account::{AccountService, AccountServiceConfig};
use crate::services::mail::MailServiceTrait;
use crate::services::password::{PasswordHasher, PasswordHasherConfig};
use crate::services::token::{TokenService, TokenServiceConfig};

#[derive(Debug, Clone)]
pub struct SentMail {
    pub subject: String,
    pub receivers: Vec<String>,
    pub body: String,
}

/// Records every message; can be switched to fail
#[derive(Default)]
pub struct RecordingMailService {
    pub sent: Mutex<Vec<SentMail>>,
    fail: AtomicBool,
}

impl RecordingMailService {
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last(&self) -> SentMail {
        self.sent.lock().unwrap().last().cloned().expect("no mail sent")
    }

    /// Raw token embedded in the last link that was mailed
    pub fn last_token(&self) -> String {
        let body = self.last().body;
        let start = body.find("token=").expect("no link in mail") + "token=".len();
        body[start..]
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string()
    }
}

#[async_trait]
impl MailServiceTrait for RecordingMailService {
    async fn send_email(
        &self,
        subject: &str,
        receivers: &[String],
        message: &str,
    ) -> Result<String, String> {
        if self.fail.load(Ordering::SeqCst) {
            return Err("SMTP connection refused".to_string());
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(SentMail {
            subject: subject.to_string(),
            receivers: receivers.to_vec(),
            body: message.to_string(),
        });
        Ok(format!("mock-{}", sent.len()))
    }
}

pub struct Harness {
    pub service: AccountService<MockUserRepository, RecordingMailService>,
    pub repo: Arc<MockUserRepository>,
    pub mail: Arc<RecordingMailService>,
    pub tokens: Arc<TokenService>,
}

pub fn harness() -> Harness {
    let repo = Arc::new(MockUserRepository::new());
    let mail = Arc::new(RecordingMailService::default());
    let hasher = Arc::new(PasswordHasher::new(PasswordHasherConfig {
        pepper: Some("test-pepper".to_string()),
        cost: 4,
        min_length: 8,
    }));
    let tokens = Arc::new(TokenService::new(TokenServiceConfig::new("test-secret")));
    let config = AccountServiceConfig::default().with_base_url("https://app.example.com/");

    let service = AccountService::new(
        Arc::clone(&repo),
        Arc::clone(&mail),
        hasher,
        Arc::clone(&tokens),
        config,
    );

    Harness {
        service,
        repo,
        mail,
        tokens,
    }
}

impl Harness {
    /// Register a user and confirm its primary email
    pub async fn verified_user(&self, username: &str, email: &str, password: &str) {
        self.service.register(username, email, password).await.unwrap();
        let token = self.mail.last_token();
        self.service.verify_email(&token).await.unwrap();
    }
}
