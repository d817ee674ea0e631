//! Configuration for the token service

use jsonwebtoken::Algorithm;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Server-side signing secret
    pub secret: String,
    /// Signing algorithm (HMAC family)
    pub algorithm: Algorithm,
    /// Lifetime used when a caller passes no explicit ttl
    pub default_expiry_minutes: i64,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            secret: "development-secret-please-change-in-production".to_string(),
            algorithm: Algorithm::HS256,
            default_expiry_minutes: 30,
        }
    }
}

impl TokenServiceConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Self::default()
        }
    }

    pub fn with_default_expiry_minutes(mut self, minutes: i64) -> Self {
        self.default_expiry_minutes = minutes;
        self
    }
}
