//! Main account service implementation

use std::sync::Arc;

use chrono::Duration;
use tg_shared::utils::validation::validators::{is_valid_email, mask_email, min_length, not_empty};
use uuid::Uuid;

use crate::domain::entities::token::{
    GeneratedToken, PasswordResetToken, TokenType, VerifiedEmailToken,
};
use crate::domain::entities::user::{Email, User, USERNAME_MAX_LENGTH};
use crate::errors::{AuthError, DomainError, DomainResult, TokenError, ValidationError};
use crate::repositories::UserRepository;
use crate::services::mail::MailServiceTrait;
use crate::services::password::PasswordHasher;
use crate::services::token::TokenService;

use super::config::{describe_ttl, AccountServiceConfig};
use super::types::{EmailVerified, PasswordResetIssued};

const VERIFY_SUBJECT: &str = "Verify Your Email";
const VERIFY_ADDED_SUBJECT: &str = "Verify Your Email Address";
const RESET_SUBJECT: &str = "Password Reset Request";

/// Account service orchestrating the token-mediated email and password flows
pub struct AccountService<U, M>
where
    U: UserRepository,
    M: MailServiceTrait,
{
    /// User repository for database operations
    user_repository: Arc<U>,
    /// Mail capability used to deliver links
    mail_service: Arc<M>,
    /// Password hasher (bcrypt + pepper)
    password_hasher: Arc<PasswordHasher>,
    /// Token service for one-time tokens
    token_service: Arc<TokenService>,
    /// Service configuration
    config: AccountServiceConfig,
}

impl<U, M> AccountService<U, M>
where
    U: UserRepository,
    M: MailServiceTrait,
{
    /// Create a new account service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Repository for users, emails and tokens
    /// * `mail_service` - Mail capability for verification and reset links
    /// * `password_hasher` - Credential hasher
    /// * `token_service` - Service minting one-time tokens
    /// * `config` - Service configuration
    pub fn new(
        user_repository: Arc<U>,
        mail_service: Arc<M>,
        password_hasher: Arc<PasswordHasher>,
        token_service: Arc<TokenService>,
        config: AccountServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            mail_service,
            password_hasher,
            token_service,
            config,
        }
    }

    /// Register a new user with one primary email and send a verification link
    ///
    /// The account exists once this returns, even when it returns
    /// `EMAIL_SEND_FAILED`; `resend_verification` issues a fresh link.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<User> {
        // Step 1: Validate input
        if !not_empty(username) || !not_empty(email) || password.is_empty() {
            return Err(ValidationError::AllFieldsRequired.into());
        }
        if username.chars().count() > USERNAME_MAX_LENGTH {
            return Err(ValidationError::InvalidLength {
                field: "username".to_string(),
                max: USERNAME_MAX_LENGTH,
            }
            .into());
        }
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail.into());
        }

        // Step 2: Hash password and persist user with its primary email
        let password_hash = self.hash_password(password).await?;
        let user = self
            .user_repository
            .create_user(User::new(username, password_hash, email))
            .await?;

        tracing::info!(
            event = "user_registered",
            user_id = %user.id,
            email = %mask_email(email),
            "User registered"
        );

        // Step 3: Issue and deliver the verification link
        let primary = user
            .primary_email()
            .cloned()
            .ok_or(AuthError::NoActivePrimaryEmail)?;
        self.issue_verification(user.id, &primary, self.config.verify_email_ttl, VERIFY_SUBJECT)
            .await?;

        Ok(user)
    }

    /// Authenticate a user by username and password
    ///
    /// Unknown usernames and wrong passwords fail identically. Session or
    /// access token issuance is left to the caller.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<User> {
        if !not_empty(username) {
            return Err(ValidationError::required("username").into());
        }
        if password.is_empty() {
            return Err(ValidationError::required("password").into());
        }

        let user = match self.user_repository.get_user(username).await {
            Ok(user) => user,
            Err(DomainError::Auth(AuthError::UserNotFound)) => {
                tracing::info!(event = "login_failed", reason = "unknown_user", "Login rejected");
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        if !self.verify_password(password, &user.password_hash).await? {
            tracing::info!(
                event = "login_failed",
                user_id = %user.id,
                reason = "wrong_password",
                "Login rejected"
            );
            return Err(AuthError::InvalidCredentials.into());
        }

        let primary = user
            .primary_email()
            .ok_or(AuthError::NoActivePrimaryEmail)?;
        if !primary.is_verified() {
            return Err(AuthError::EmailNotVerified.into());
        }

        tracing::info!(event = "login_succeeded", user_id = %user.id, "User logged in");
        Ok(user)
    }

    /// Email a password reset link to a verified address
    pub async fn forgot_password(&self, email: &str) -> DomainResult<PasswordResetIssued> {
        if !not_empty(email) {
            return Err(ValidationError::required("email").into());
        }

        // Step 1: Only verified addresses may receive reset links
        let verified = self.user_repository.get_verified_email(email).await?;

        // Step 2: Mint and persist the token
        let token = self.token_service.generate(
            &verified.address,
            verified.user_id,
            TokenType::ResetPassword,
            Some(self.config.reset_password_ttl),
        )?;
        let record = self
            .user_repository
            .create_password_reset_token(PasswordResetToken::new(
                token.token_hash.clone(),
                verified.user_id,
                token.expires_at,
            ))
            .await?;

        // Step 3: Deliver the link, revoking the token if it never leaves
        let body = format!(
            "Hello,\n\n\
             You requested to reset your password.\n\
             Please click the link below to set a new password:\n{}\n\n\
             This link is valid for {} only.",
            self.config.reset_password_link(&token.raw_token),
            describe_ttl(self.config.reset_password_ttl),
        );
        if let Err(e) = self.deliver(RESET_SUBJECT, &verified.address, &body).await {
            if let Err(revoke_err) = self
                .user_repository
                .revoke_password_reset_token(record.id)
                .await
            {
                tracing::error!(
                    event = "token_revoke_failed",
                    token_id = %record.id,
                    error = %revoke_err,
                    "Could not revoke undelivered reset token"
                );
            }
            return Err(e);
        }

        tracing::info!(
            event = "password_reset_requested",
            user_id = %verified.user_id,
            email = %mask_email(&verified.address),
            "Password reset link sent"
        );

        Ok(PasswordResetIssued {
            message: "Password reset link has been sent to your email.".to_string(),
            expires_at: token.expires_at,
        })
    }

    /// Set a new password using an emailed reset token
    ///
    /// The stored token is consumed before the password is written, so of two
    /// concurrent resets with the same token only one changes the password.
    pub async fn reset_password(&self, raw_token: &str, new_password: &str) -> DomainResult<()> {
        // Step 1: Validate input
        if raw_token.is_empty() {
            return Err(TokenError::MissingInput.into());
        }
        if new_password.chars().count() < self.config.password_min_length {
            return Err(ValidationError::InvalidNewPassword {
                min: self.config.password_min_length,
            }
            .into());
        }

        // Step 2: Check signature, expiry and workflow
        let claims = self.token_service.verify(raw_token)?;
        if claims.token_type != TokenType::ResetPassword {
            return Err(TokenError::InvalidTokenType.into());
        }

        // Step 3: Look up the stored record by digest
        let token_hash = self.token_service.hash(raw_token)?;
        let stored = self
            .user_repository
            .get_password_reset_token(&token_hash)
            .await?;
        if stored.user_id != claims.user_id {
            return Err(TokenError::TokenMismatch.into());
        }

        // Step 4: Consume the token, then write the new password
        let password_hash = self.hash_password(new_password).await?;
        self.user_repository
            .confirm_password_reset_token(stored.id)
            .await?;
        self.user_repository
            .update_password(stored.user_id, &password_hash)
            .await?;

        tracing::info!(
            event = "password_reset_completed",
            user_id = %stored.user_id,
            "Password updated via reset token"
        );
        Ok(())
    }

    /// Confirm an email address using an emailed verification token
    pub async fn verify_email(&self, raw_token: &str) -> DomainResult<EmailVerified> {
        if raw_token.is_empty() {
            return Err(TokenError::MissingInput.into());
        }

        let claims = self.token_service.verify(raw_token)?;
        if claims.token_type != TokenType::VerifyEmail {
            return Err(TokenError::InvalidTokenType.into());
        }
        if claims.email.is_empty() || claims.user_id.is_nil() {
            return Err(TokenError::MissingTokenData.into());
        }

        let stored = self
            .user_repository
            .get_verified_email_token(&claims.email)
            .await?;

        // A valid signature is not enough: the record must match too
        if stored.user_id != claims.user_id
            || !self.token_service.match_hash(raw_token, &stored.token_hash)?
        {
            return Err(TokenError::TokenMismatch.into());
        }

        self.user_repository
            .confirm_email(stored.email_id, stored.id)
            .await?;

        tracing::info!(
            event = "email_verified",
            user_id = %stored.user_id,
            email = %mask_email(&claims.email),
            "Email verified"
        );

        Ok(EmailVerified {
            message: "Email has been successfully verified.".to_string(),
        })
    }

    /// Attach a secondary email to a user and send it a verification link
    pub async fn create_email(&self, user_id: Uuid, address: &str) -> DomainResult<Email> {
        if user_id.is_nil() {
            return Err(ValidationError::required("user_id").into());
        }
        if !not_empty(address) {
            return Err(ValidationError::required("email").into());
        }
        if !is_valid_email(address) {
            return Err(ValidationError::InvalidEmail.into());
        }

        let email = self
            .user_repository
            .create_email(Email::new(user_id, address, false))
            .await?;

        self.issue_verification(
            user_id,
            &email,
            self.config.added_email_ttl,
            VERIFY_ADDED_SUBJECT,
        )
        .await?;

        Ok(email)
    }

    /// Issue a fresh verification link for an address that is not yet verified
    pub async fn resend_verification(&self, address: &str) -> DomainResult<()> {
        if !not_empty(address) {
            return Err(ValidationError::required("email").into());
        }

        let email = self.user_repository.get_email(address).await?;
        if email.is_verified() {
            return Err(AuthError::EmailAlreadyVerified.into());
        }

        self.issue_verification(
            email.user_id,
            &email,
            self.config.verify_email_ttl,
            VERIFY_SUBJECT,
        )
        .await?;
        Ok(())
    }

    /// Soft-delete one of the user's secondary emails
    pub async fn delete_email(&self, user_id: Uuid, email_id: Uuid) -> DomainResult<()> {
        if user_id.is_nil() {
            return Err(ValidationError::required("user_id").into());
        }
        if email_id.is_nil() {
            return Err(ValidationError::required("email_id").into());
        }

        self.user_repository.delete_email(email_id, user_id).await?;
        tracing::info!(event = "email_deleted", user_id = %user_id, email_id = %email_id, "Email removed");
        Ok(())
    }

    /// Change a username
    pub async fn reset_username(&self, current: &str, new: &str) -> DomainResult<User> {
        if !not_empty(current) {
            return Err(ValidationError::required("current_username").into());
        }
        let min = self.config.username_min_length;
        if !not_empty(new) || !min_length(new.trim(), min) {
            return Err(ValidationError::InvalidNewUsername { min }.into());
        }
        if new.chars().count() > USERNAME_MAX_LENGTH {
            return Err(ValidationError::InvalidLength {
                field: "new_username".to_string(),
                max: USERNAME_MAX_LENGTH,
            }
            .into());
        }

        let user = self.user_repository.update_username(current, new).await?;
        tracing::info!(event = "username_changed", user_id = %user.id, "Username updated");
        Ok(user)
    }

    /// Load a user with its active emails
    pub async fn get_user(&self, username: &str) -> DomainResult<User> {
        if !not_empty(username) {
            return Err(ValidationError::required("username").into());
        }
        self.user_repository.get_user(username).await
    }

    /// Mint, persist and mail a verification token for `email`
    async fn issue_verification(
        &self,
        user_id: Uuid,
        email: &Email,
        ttl: Duration,
        subject: &str,
    ) -> DomainResult<GeneratedToken> {
        let token = self.token_service.generate(
            &email.address,
            user_id,
            TokenType::VerifyEmail,
            Some(ttl),
        )?;
        let record = self
            .user_repository
            .create_verified_email_token(VerifiedEmailToken::new(
                token.token_hash.clone(),
                email.id,
                user_id,
                token.expires_at,
            ))
            .await?;

        let body = format!(
            "Hello,\n\n\
             Please verify your email address by clicking the link below:\n{}\n\n\
             This link will expire in {}.\n\
             If you did not request this, please ignore this email.",
            self.config.verify_email_link(&token.raw_token),
            describe_ttl(ttl),
        );

        if let Err(e) = self.deliver(subject, &email.address, &body).await {
            if let Err(revoke_err) = self
                .user_repository
                .revoke_verified_email_token(record.id)
                .await
            {
                tracing::error!(
                    event = "token_revoke_failed",
                    token_id = %record.id,
                    error = %revoke_err,
                    "Could not revoke undelivered verification token"
                );
            }
            return Err(e);
        }

        Ok(token)
    }

    async fn deliver(&self, subject: &str, address: &str, body: &str) -> DomainResult<String> {
        self.mail_service
            .send_email(subject, &[address.to_string()], body)
            .await
            .map_err(|reason| {
                tracing::warn!(
                    event = "email_send_failed",
                    email = %mask_email(address),
                    reason = %reason,
                    "Mail delivery failed"
                );
                DomainError::MailDelivery { reason }
            })
    }

    /// bcrypt is CPU-bound; keep it off the async workers
    async fn hash_password(&self, password: &str) -> DomainResult<String> {
        let hasher = Arc::clone(&self.password_hasher);
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Password hashing task failed: {}", e),
            })?
    }

    async fn verify_password(&self, password: &str, hash: &str) -> DomainResult<bool> {
        let hasher = Arc::clone(&self.password_hasher);
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Password verification task failed: {}", e),
            })?
    }
}
