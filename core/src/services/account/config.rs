//! Configuration for the account service

use chrono::Duration;

/// Configuration for the account service
#[derive(Debug, Clone)]
pub struct AccountServiceConfig {
    /// Public base URL that emailed links point at
    pub base_url: String,
    /// Lifetime of the verification link sent on registration or resend
    pub verify_email_ttl: Duration,
    /// Lifetime of the verification link sent for an added email
    pub added_email_ttl: Duration,
    /// Lifetime of a password reset link
    pub reset_password_ttl: Duration,
    /// Minimum length of a new username
    pub username_min_length: usize,
    /// Minimum length of a new password
    pub password_min_length: usize,
}

impl Default for AccountServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            verify_email_ttl: Duration::hours(24),
            added_email_ttl: Duration::hours(2),
            reset_password_ttl: Duration::hours(1),
            username_min_length: 3,
            password_min_length: 8,
        }
    }
}

impl AccountServiceConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Link to the email verification page
    pub fn verify_email_link(&self, raw_token: &str) -> String {
        format!("{}/verify-email?token={}", self.base_url.trim_end_matches('/'), raw_token)
    }

    /// Link to the password reset page
    pub fn reset_password_link(&self, raw_token: &str) -> String {
        format!("{}/reset-password?token={}", self.base_url.trim_end_matches('/'), raw_token)
    }
}

/// Human readable lifetime for mail bodies: "24 hours", "1 hour", "30 minutes"
pub(crate) fn describe_ttl(ttl: Duration) -> String {
    let hours = ttl.num_hours();
    if hours >= 1 && ttl == Duration::hours(hours) {
        if hours == 1 {
            "1 hour".to_string()
        } else {
            format!("{} hours", hours)
        }
    } else {
        format!("{} minutes", ttl.num_minutes())
    }
}
