//! Main token service implementation

use chrono::{Duration, TimeZone, Utc};
use constant_time_eq::constant_time_eq;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::entities::token::{GeneratedToken, TokenClaims, TokenType};
use crate::errors::{DomainError, TokenError};

use super::config::TokenServiceConfig;

/// Service for minting and checking one-time workflow tokens
///
/// The raw token is a signed JWT carrying `{email, user_id, type, exp}`; only
/// its SHA-256 digest is meant to be persisted.
pub struct TokenService {
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a new token service instance
    pub fn new(config: TokenServiceConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.leeway = 0;
        validation.validate_exp = true;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Mints a token for one workflow
    ///
    /// # Arguments
    ///
    /// * `email` - Subject address embedded in the payload
    /// * `user_id` - Owning user
    /// * `token_type` - Workflow the token is limited to
    /// * `ttl` - Lifetime; the configured default when `None`
    ///
    /// # Returns
    ///
    /// * `Ok(GeneratedToken)` - Raw token, its storage digest and expiry
    /// * `Err(TokenError::GenerationFailed)` - Missing subject data or signing failure
    pub fn generate(
        &self,
        email: &str,
        user_id: Uuid,
        token_type: TokenType,
        ttl: Option<Duration>,
    ) -> Result<GeneratedToken, DomainError> {
        if email.trim().is_empty() || user_id.is_nil() {
            return Err(TokenError::GenerationFailed.into());
        }

        let ttl = ttl.unwrap_or_else(|| Duration::minutes(self.config.default_expiry_minutes));
        let exp = (Utc::now() + ttl).timestamp();
        let expires_at = Utc
            .timestamp_opt(exp, 0)
            .single()
            .ok_or(TokenError::GenerationFailed)?;

        let claims = TokenClaims {
            email: email.to_string(),
            user_id,
            token_type,
            exp,
            jti: Uuid::new_v4(),
        };

        let raw_token = encode(&Header::new(self.config.algorithm), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!(
                    event = "token_generation_failed",
                    token_type = %token_type,
                    error = %e,
                    "Failed to sign token"
                );
                TokenError::GenerationFailed
            })?;
        let token_hash = self.hash(&raw_token)?;

        Ok(GeneratedToken {
            raw_token,
            token_hash,
            expires_at,
        })
    }

    /// Checks signature and expiry, returning the payload
    ///
    /// A token is expired from the second its `exp` is reached.
    pub fn verify(&self, raw_token: &str) -> Result<TokenClaims, DomainError> {
        if raw_token.is_empty() {
            return Err(TokenError::InvalidOrExpired.into());
        }

        let token_data = decode::<TokenClaims>(raw_token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(
                    event = "token_rejected",
                    reason = ?e.kind(),
                    "Token failed verification"
                );
                TokenError::InvalidOrExpired
            })?;

        if Utc::now().timestamp() >= token_data.claims.exp {
            return Err(TokenError::InvalidOrExpired.into());
        }

        Ok(token_data.claims)
    }

    /// Deterministic storage digest of a raw token (lowercase hex SHA-256)
    pub fn hash(&self, raw_token: &str) -> Result<String, DomainError> {
        if raw_token.is_empty() {
            return Err(TokenError::MissingInput.into());
        }

        let mut hasher = Sha256::new();
        hasher.update(raw_token.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Whether `raw_token` hashes to `stored_hash`, compared in constant time
    pub fn match_hash(&self, raw_token: &str, stored_hash: &str) -> Result<bool, DomainError> {
        if raw_token.is_empty() || stored_hash.is_empty() {
            return Err(TokenError::MissingInput.into());
        }

        let computed = self.hash(raw_token)?;
        Ok(constant_time_eq(computed.as_bytes(), stored_hash.as_bytes()))
    }
}
