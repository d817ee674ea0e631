use crate::errors::{DomainError, ValidationError};

/// Configuration for password hashing
#[derive(Debug, Clone)]
pub struct PasswordHasherConfig {
    /// Deployment-wide secret appended to every password before hashing
    pub pepper: Option<String>,
    /// bcrypt cost factor
    pub cost: u32,
    /// Minimum accepted password length, in characters
    pub min_length: usize,
}

impl Default for PasswordHasherConfig {
    fn default() -> Self {
        Self {
            pepper: None,
            cost: bcrypt::DEFAULT_COST,
            min_length: 8,
        }
    }
}

/// One-way password hashing with an optional pepper
pub struct PasswordHasher {
    config: PasswordHasherConfig,
}

impl PasswordHasher {
    pub fn new(config: PasswordHasherConfig) -> Self {
        Self { config }
    }

    pub fn min_length(&self) -> usize {
        self.config.min_length
    }

    fn peppered(&self, password: &str) -> String {
        match &self.config.pepper {
            Some(pepper) => format!("{}{}", password, pepper),
            None => password.to_string(),
        }
    }

    /// Hash a password; the output embeds algorithm, cost and salt
    pub fn hash(&self, password: &str) -> Result<String, DomainError> {
        if password.chars().count() < self.config.min_length {
            return Err(ValidationError::InvalidPasswordLength {
                min: self.config.min_length,
            }
            .into());
        }

        bcrypt::hash(self.peppered(password), self.config.cost).map_err(|e| {
            DomainError::Internal {
                message: format!("Password hashing failed: {}", e),
            }
        })
    }

    /// Check a password against a stored hash
    ///
    /// A malformed stored hash counts as a mismatch.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        if password.is_empty() || hash.is_empty() {
            return Err(ValidationError::InvalidPasswordInputs.into());
        }

        match bcrypt::verify(self.peppered(password), hash) {
            Ok(matches) => Ok(matches),
            Err(e) => {
                tracing::warn!(
                    event = "malformed_password_hash",
                    error = %e,
                    "Stored password hash could not be parsed"
                );
                Ok(false)
            }
        }
    }
}
