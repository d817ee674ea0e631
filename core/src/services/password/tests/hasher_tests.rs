//! Unit tests for the password hasher

use crate::errors::{DomainError, ValidationError};
use crate::services::password::{PasswordHasher, PasswordHasherConfig};

fn hasher(pepper: Option<&str>) -> PasswordHasher {
    PasswordHasher::new(PasswordHasherConfig {
        pepper: pepper.map(str::to_string),
        cost: 4,
        min_length: 8,
    })
}

#[test]
fn test_hash_and_verify() {
    let hasher = hasher(Some("pepper"));
    let hash = hasher.hash("password123").unwrap();

    assert!(hash.starts_with("$2"));
    assert!(hasher.verify("password123", &hash).unwrap());
    assert!(!hasher.verify("password124", &hash).unwrap());
}

#[test]
fn test_hashes_are_salted() {
    let hasher = hasher(None);
    let first = hasher.hash("password123").unwrap();
    let second = hasher.hash("password123").unwrap();

    assert_ne!(first, second);
    assert!(hasher.verify("password123", &second).unwrap());
}

#[test]
fn test_pepper_is_part_of_the_secret() {
    let hash = hasher(Some("pepper-a")).hash("password123").unwrap();

    assert!(!hasher(Some("pepper-b")).verify("password123", &hash).unwrap());
    assert!(!hasher(None).verify("password123", &hash).unwrap());
}

#[test]
fn test_short_password_rejected() {
    let result = hasher(None).hash("short");
    assert!(matches!(
        result,
        Err(DomainError::Validation(ValidationError::InvalidPasswordLength { min: 8 }))
    ));
}

#[test]
fn test_verify_requires_inputs() {
    let hasher = hasher(None);
    assert!(matches!(
        hasher.verify("", "$2b$04$abc"),
        Err(DomainError::Validation(ValidationError::InvalidPasswordInputs))
    ));
    assert!(matches!(
        hasher.verify("password123", ""),
        Err(DomainError::Validation(ValidationError::InvalidPasswordInputs))
    ));
}

#[test]
fn test_malformed_hash_is_a_mismatch() {
    let hasher = hasher(None);
    assert!(!hasher.verify("password123", "not-a-bcrypt-hash").unwrap());
}
