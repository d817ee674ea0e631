//! Mock implementation of UserRepository for testing

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::{PasswordResetToken, VerifiedEmailToken};
use crate::domain::entities::user::{Email, User};
use crate::errors::{AuthError, DomainError, RepositoryError, TokenError};

use super::trait_::UserRepository;

#[derive(Default)]
struct UserStore {
    /// Users are stored without emails; `hydrate` attaches them on read
    users: HashMap<Uuid, User>,
    emails: HashMap<Uuid, Email>,
    email_tokens: HashMap<Uuid, VerifiedEmailToken>,
    reset_tokens: HashMap<Uuid, PasswordResetToken>,
}

impl UserStore {
    fn hydrate(&self, user: &User) -> User {
        let mut emails: Vec<Email> = self
            .emails
            .values()
            .filter(|e| e.user_id == user.id && e.is_active())
            .cloned()
            .collect();
        emails.sort_by_key(|e| e.created_at);

        User {
            emails,
            ..user.clone()
        }
    }

    fn find_user(&self, username: &str) -> Option<&User> {
        self.users.values().find(|u| u.username == username)
    }

    fn address_in_use(&self, address: &str) -> bool {
        self.emails
            .values()
            .any(|e| e.is_active() && e.address == address)
    }
}

/// Mock user repository for testing
///
/// Enforces the same invariants as the SQL implementation: atomic user
/// creation, single-use token confirmation and soft deletes.
pub struct MockUserRepository {
    store: Arc<RwLock<UserStore>>,
}

impl MockUserRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(UserStore::default())),
        }
    }

    /// Raw verification token row, including consumed ones
    pub async fn verified_email_token(&self, token_id: Uuid) -> Option<VerifiedEmailToken> {
        self.store.read().await.email_tokens.get(&token_id).cloned()
    }

    /// Raw reset token row, including consumed ones
    pub async fn password_reset_token(&self, token_id: Uuid) -> Option<PasswordResetToken> {
        self.store.read().await.reset_tokens.get(&token_id).cloned()
    }

    /// All reset tokens issued for a user
    pub async fn password_reset_tokens_for(&self, user_id: Uuid) -> Vec<PasswordResetToken> {
        self.store
            .read()
            .await
            .reset_tokens
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }

    /// All verification tokens issued for a user
    pub async fn verified_email_tokens_for(&self, user_id: Uuid) -> Vec<VerifiedEmailToken> {
        self.store
            .read()
            .await
            .email_tokens
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Number of stored users
    pub async fn user_count(&self) -> usize {
        self.store.read().await.users.len()
    }

    /// Number of stored email rows, deleted ones included
    pub async fn email_count(&self) -> usize {
        self.store.read().await.emails.len()
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn create_user(&self, user: User) -> Result<User, DomainError> {
        let mut store = self.store.write().await;

        if store.find_user(&user.username).is_some() {
            return Err(AuthError::UsernameAlreadyExists.into());
        }
        if user.emails.iter().any(|e| store.address_in_use(&e.address)) {
            return Err(AuthError::EmailAlreadyExists.into());
        }
        if user.active_primary_count() != 1 {
            return Err(AuthError::PrimaryEmailRequired.into());
        }

        for email in &user.emails {
            let email = Email {
                user_id: user.id,
                ..email.clone()
            };
            store.emails.insert(email.id, email);
        }
        let stored = User {
            emails: Vec::new(),
            ..user
        };
        let hydrated = store.hydrate(&stored);
        store.users.insert(stored.id, stored);
        Ok(hydrated)
    }

    async fn get_user(&self, username: &str) -> Result<User, DomainError> {
        let store = self.store.read().await;
        store
            .find_user(username)
            .map(|u| store.hydrate(u))
            .ok_or_else(|| AuthError::UserNotFound.into())
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Result<User, DomainError> {
        let store = self.store.read().await;
        store
            .users
            .get(&user_id)
            .map(|u| store.hydrate(u))
            .ok_or_else(|| AuthError::UserNotFound.into())
    }

    async fn update_password(
        &self,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        let user = store
            .users
            .get_mut(&user_id)
            .ok_or(AuthError::UserNotFound)?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn update_username(&self, current: &str, new: &str) -> Result<User, DomainError> {
        let mut store = self.store.write().await;

        let user_id = store
            .find_user(current)
            .map(|u| u.id)
            .ok_or(AuthError::UserNotFound)?;
        if store.find_user(new).is_some() {
            return Err(AuthError::UsernameAlreadyExists.into());
        }

        let user = store
            .users
            .get_mut(&user_id)
            .ok_or(AuthError::UserNotFound)?;
        user.username = new.to_string();
        let updated = user.clone();
        Ok(store.hydrate(&updated))
    }

    async fn create_email(&self, email: Email) -> Result<Email, DomainError> {
        let mut store = self.store.write().await;

        if !store.users.contains_key(&email.user_id) {
            return Err(AuthError::UserNotFound.into());
        }
        if store.address_in_use(&email.address) {
            return Err(AuthError::EmailAlreadyExists.into());
        }

        store.emails.insert(email.id, email.clone());
        Ok(email)
    }

    async fn delete_email(&self, email_id: Uuid, user_id: Uuid) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        let email = store
            .emails
            .get_mut(&email_id)
            .filter(|e| e.user_id == user_id && e.is_active())
            .ok_or(AuthError::EmailNotFound)?;

        if email.is_primary {
            return Err(AuthError::PrimaryEmailRequired.into());
        }
        email.soft_delete(Utc::now());
        Ok(())
    }

    async fn get_email(&self, address: &str) -> Result<Email, DomainError> {
        let store = self.store.read().await;
        store
            .emails
            .values()
            .find(|e| e.is_active() && e.address == address)
            .cloned()
            .ok_or_else(|| AuthError::EmailNotFound.into())
    }

    async fn get_verified_email(&self, address: &str) -> Result<Email, DomainError> {
        let store = self.store.read().await;
        store
            .emails
            .values()
            .find(|e| e.is_active() && e.is_verified() && e.address == address)
            .cloned()
            .ok_or_else(|| AuthError::EmailNotVerified.into())
    }

    async fn create_verified_email_token(
        &self,
        token: VerifiedEmailToken,
    ) -> Result<VerifiedEmailToken, DomainError> {
        let mut store = self.store.write().await;
        if store
            .email_tokens
            .values()
            .any(|t| t.token_hash == token.token_hash)
        {
            return Err(RepositoryError::new("Duplicate verification token hash").into());
        }
        store.email_tokens.insert(token.id, token.clone());
        Ok(token)
    }

    async fn get_verified_email_token(
        &self,
        address: &str,
    ) -> Result<VerifiedEmailToken, DomainError> {
        let store = self.store.read().await;
        let now = Utc::now();

        let email_id = store
            .emails
            .values()
            .find(|e| e.is_active() && e.address == address)
            .map(|e| e.id)
            .ok_or(TokenError::VerificationTokenNotFound)?;

        store
            .email_tokens
            .values()
            .filter(|t| t.email_id == email_id && t.is_valid_at(now))
            .max_by_key(|t| t.created_at)
            .cloned()
            .ok_or_else(|| TokenError::VerificationTokenNotFound.into())
    }

    async fn confirm_email(&self, email_id: Uuid, token_id: Uuid) -> Result<(), DomainError> {
        let mut store = self.store.write().await;

        match store.email_tokens.get(&token_id) {
            None => return Err(TokenError::VerificationTokenNotFound.into()),
            Some(token) if token.is_used => return Err(TokenError::TokenAlreadyUsed.into()),
            Some(_) => {}
        }
        if !store
            .emails
            .get(&email_id)
            .map(|e| e.is_active())
            .unwrap_or(false)
        {
            return Err(AuthError::EmailNotFound.into());
        }

        let now = Utc::now();
        if let Some(token) = store.email_tokens.get_mut(&token_id) {
            token.is_used = true;
            token.used_at = Some(now);
        }
        if let Some(email) = store.emails.get_mut(&email_id) {
            email.mark_verified(now);
        }
        Ok(())
    }

    async fn revoke_verified_email_token(&self, token_id: Uuid) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        let token = store
            .email_tokens
            .get_mut(&token_id)
            .ok_or(TokenError::VerificationTokenNotFound)?;
        token.is_used = true;
        Ok(())
    }

    async fn create_password_reset_token(
        &self,
        token: PasswordResetToken,
    ) -> Result<PasswordResetToken, DomainError> {
        let mut store = self.store.write().await;
        if store
            .reset_tokens
            .values()
            .any(|t| t.token_hash == token.token_hash)
        {
            return Err(RepositoryError::new("Duplicate reset token hash").into());
        }
        store.reset_tokens.insert(token.id, token.clone());
        Ok(token)
    }

    async fn get_password_reset_token(
        &self,
        token_hash: &str,
    ) -> Result<PasswordResetToken, DomainError> {
        let store = self.store.read().await;
        let now = Utc::now();

        let matching: Vec<&PasswordResetToken> = store
            .reset_tokens
            .values()
            .filter(|t| t.token_hash == token_hash)
            .collect();

        if let Some(token) = matching
            .iter()
            .filter(|t| t.is_valid_at(now))
            .max_by_key(|t| t.created_at)
        {
            return Ok((*token).clone());
        }
        if matching.iter().any(|t| t.is_used) {
            return Err(TokenError::TokenAlreadyUsed.into());
        }
        Err(TokenError::TokenNotFound.into())
    }

    async fn confirm_password_reset_token(&self, token_id: Uuid) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        let token = store
            .reset_tokens
            .get_mut(&token_id)
            .ok_or(TokenError::TokenNotFound)?;

        if token.is_used {
            return Err(TokenError::TokenAlreadyUsed.into());
        }
        token.is_used = true;
        token.used_at = Some(Utc::now());
        Ok(())
    }

    async fn revoke_password_reset_token(&self, token_id: Uuid) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        let token = store
            .reset_tokens
            .get_mut(&token_id)
            .ok_or(TokenError::TokenNotFound)?;
        token.is_used = true;
        Ok(())
    }
}
