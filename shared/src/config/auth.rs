//! Credential hashing, one-time token and link configuration

use serde::{Deserialize, Serialize};

const DEFAULT_TOKEN_SECRET: &str = "development-secret-please-change-in-production";

/// Authentication configuration
///
/// Feeds the password hasher, the token service and the account use cases.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Secret used to sign verification and reset tokens (HS256)
    pub token_secret: String,

    /// Token lifetime used when a caller does not pass one, in minutes
    pub token_expiry_minutes: i64,

    /// Deployment-wide secret appended to passwords before hashing
    #[serde(default)]
    pub password_pepper: Option<String>,

    /// bcrypt cost factor
    pub bcrypt_cost: u32,

    /// Minimum accepted password length
    pub password_min_length: usize,

    /// Minimum accepted username length
    pub username_min_length: usize,

    /// Public base URL used to build links sent by mail
    pub base_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: DEFAULT_TOKEN_SECRET.to_string(),
            token_expiry_minutes: 30,
            password_pepper: None,
            bcrypt_cost: 12,
            password_min_length: 8,
            username_min_length: 3,
            base_url: String::from("http://localhost:3000"),
        }
    }
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            token_secret: std::env::var("TOKEN_SECRET").unwrap_or(defaults.token_secret),
            token_expiry_minutes: std::env::var("TOKEN_EXPIRY_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.token_expiry_minutes),
            password_pepper: std::env::var("PASSWORD_PEPPER")
                .ok()
                .filter(|p| !p.is_empty()),
            bcrypt_cost: std::env::var("BCRYPT_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.bcrypt_cost),
            base_url: std::env::var("BASE_URL").unwrap_or(defaults.base_url),
            ..defaults
        }
    }

    /// Set the token signing secret
    pub fn with_token_secret(mut self, secret: impl Into<String>) -> Self {
        self.token_secret = secret.into();
        self
    }

    /// Set the password pepper
    pub fn with_pepper(mut self, pepper: impl Into<String>) -> Self {
        self.password_pepper = Some(pepper.into());
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.token_secret == DEFAULT_TOKEN_SECRET
    }
}
