//! Outgoing mail configuration

use serde::{Deserialize, Serialize};

/// SMTP / mail provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    /// Mail provider ("smtp", "mock")
    pub provider: String,

    /// SMTP relay host
    pub host: String,

    /// SMTP port
    pub port: u16,

    /// SMTP username, also used as the sender address
    pub username: String,

    /// SMTP password
    #[serde(default)]
    pub password: String,

    /// Display name used in the From header
    pub from_name: String,

    /// SMTP command timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            provider: String::from("mock"),
            host: String::from("smtp.gmail.com"),
            port: 587,
            username: String::from("no-reply@taskgroup.local"),
            password: String::new(),
            from_name: String::from("TaskGroup"),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl MailConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            provider: std::env::var("MAIL_PROVIDER").unwrap_or(defaults.provider),
            host: std::env::var("MAIL_HOST").unwrap_or(defaults.host),
            port: std::env::var("MAIL_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            username: std::env::var("MAIL_USERNAME").unwrap_or(defaults.username),
            password: std::env::var("MAIL_PASSWORD").unwrap_or(defaults.password),
            from_name: std::env::var("MAIL_FROM_NAME").unwrap_or(defaults.from_name),
            timeout_secs: defaults.timeout_secs,
        }
    }

    /// `From` header value, e.g. `TaskGroup <no-reply@taskgroup.local>`
    pub fn sender(&self) -> String {
        format!("{} <{}>", self.from_name, self.username)
    }
}

fn default_timeout_secs() -> u64 {
    10
}
