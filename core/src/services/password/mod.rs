//! Credential hashing
//!
//! bcrypt over the password with a deployment-wide pepper appended.

mod hasher;

#[cfg(test)]
mod tests;

pub use hasher::{PasswordHasher, PasswordHasherConfig};
