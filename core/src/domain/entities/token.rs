//! One-time token entities for email verification and password reset.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Workflow a signed token is limited to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Confirms ownership of an email address
    VerifyEmail,
    /// Authorizes a single password change
    ResetPassword,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::VerifyEmail => "verify_email",
            TokenType::ResetPassword => "reset_password",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verify_email" => Ok(TokenType::VerifyEmail),
            "reset_password" => Ok(TokenType::ResetPassword),
            other => Err(format!("Unknown token type: {}", other)),
        }
    }
}

/// Claims structure for the signed token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject email address
    pub email: String,

    /// Owning user
    pub user_id: Uuid,

    /// Workflow discriminator
    #[serde(rename = "type")]
    pub token_type: TokenType,

    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,

    /// Per-token nonce; two tokens minted in the same second still differ
    pub jti: Uuid,
}

/// Result of minting a token
///
/// `raw_token` goes out by email only; `token_hash` is what gets persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedToken {
    pub raw_token: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

/// A pending email-verification attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedEmailToken {
    pub id: Uuid,
    pub token_hash: String,
    pub email_id: Uuid,
    pub user_id: Uuid,
    pub is_used: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

impl VerifiedEmailToken {
    pub fn new(
        token_hash: impl Into<String>,
        email_id: Uuid,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            token_hash: token_hash.into(),
            email_id,
            user_id,
            is_used: false,
            expires_at,
            created_at: Utc::now(),
            used_at: None,
        }
    }

    /// Unused and not yet expired at `now`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_used && now < self.expires_at
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

/// A pending password-reset attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetToken {
    pub id: Uuid,
    pub token_hash: String,
    pub user_id: Uuid,
    pub is_used: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

impl PasswordResetToken {
    pub fn new(token_hash: impl Into<String>, user_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            token_hash: token_hash.into(),
            user_id,
            is_used: false,
            expires_at,
            created_at: Utc::now(),
            used_at: None,
        }
    }

    /// Unused and not yet expired at `now`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_used && now < self.expires_at
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}
