//! Types for account service results

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of requesting a password reset
#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetIssued {
    /// Confirmation message for the caller
    pub message: String,
    /// When the emailed link stops working
    pub expires_at: DateTime<Utc>,
}

/// Result of confirming an email address
#[derive(Debug, Clone, Serialize)]
pub struct EmailVerified {
    pub message: String,
}
