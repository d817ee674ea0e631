//! Common validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Maximum stored length of an email address
pub const EMAIL_MAX_LENGTH: usize = 255;

/// Common validation functions
pub mod validators {
    use super::{EMAIL_MAX_LENGTH, EMAIL_PATTERN};

    /// Check if a string is not empty
    pub fn not_empty(value: &str) -> bool {
        !value.trim().is_empty()
    }

    /// Number of characters (not bytes)
    pub fn char_len(value: &str) -> usize {
        value.chars().count()
    }

    /// Check if a string length (in characters) is within bounds
    pub fn length_between(value: &str, min: usize, max: usize) -> bool {
        let len = char_len(value);
        len >= min && len <= max
    }

    /// Check if a string has at least `min` characters
    pub fn min_length(value: &str, min: usize) -> bool {
        char_len(value) >= min
    }

    /// Check if an email address is syntactically valid
    pub fn is_valid_email(email: &str) -> bool {
        email.len() <= EMAIL_MAX_LENGTH && EMAIL_PATTERN.is_match(email)
    }

    /// Mask an email address for logs: `alice@example.com` -> `a***@example.com`
    pub fn mask_email(email: &str) -> String {
        match email.split_once('@') {
            Some((local, domain)) => {
                let first = local.chars().next().map(String::from).unwrap_or_default();
                format!("{}***@{}", first, domain)
            }
            None => "***".to_string(),
        }
    }
}
