//! MySQL implementation of the UserRepository trait.
//!
//! Users, their emails and both kinds of one-time tokens. Multi-statement
//! writes (user creation, email confirmation) run in a transaction; token
//! consumption is a conditional `UPDATE ... WHERE is_used = FALSE` so a token
//! can be spent at most once even under concurrent requests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, Transaction};
use uuid::Uuid;

use tg_core::domain::entities::token::{PasswordResetToken, VerifiedEmailToken};
use tg_core::domain::entities::user::{Email, User};
use tg_core::errors::{AuthError, DomainError, TokenError};
use tg_core::repositories::UserRepository;

use super::rows::{column, is_unique_violation, storage_error, uuid_column};

const EMAIL_COLUMNS: &str =
    "id, user_id, address, is_primary, is_deleted, deleted_at, verified_at, created_at";

const EMAIL_TOKEN_COLUMNS: &str =
    "id, token_hash, email_id, user_id, is_used, expires_at, created_at, used_at";

const RESET_TOKEN_COLUMNS: &str =
    "id, token_hash, user_id, is_used, expires_at, created_at, used_at";

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Map a `users` row; emails are attached separately
    fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
        Ok(User {
            id: uuid_column(row, "id")?,
            username: column(row, "username")?,
            password_hash: column(row, "password_hash")?,
            created_at: column::<DateTime<Utc>>(row, "created_at")?,
            emails: Vec::new(),
        })
    }

    fn row_to_email(row: &MySqlRow) -> Result<Email, DomainError> {
        Ok(Email {
            id: uuid_column(row, "id")?,
            user_id: uuid_column(row, "user_id")?,
            address: column(row, "address")?,
            is_primary: column(row, "is_primary")?,
            is_deleted: column(row, "is_deleted")?,
            deleted_at: column(row, "deleted_at")?,
            verified_at: column(row, "verified_at")?,
            created_at: column(row, "created_at")?,
        })
    }

    fn row_to_email_token(row: &MySqlRow) -> Result<VerifiedEmailToken, DomainError> {
        Ok(VerifiedEmailToken {
            id: uuid_column(row, "id")?,
            token_hash: column(row, "token_hash")?,
            email_id: uuid_column(row, "email_id")?,
            user_id: uuid_column(row, "user_id")?,
            is_used: column(row, "is_used")?,
            expires_at: column(row, "expires_at")?,
            created_at: column(row, "created_at")?,
            used_at: column(row, "used_at")?,
        })
    }

    fn row_to_reset_token(row: &MySqlRow) -> Result<PasswordResetToken, DomainError> {
        Ok(PasswordResetToken {
            id: uuid_column(row, "id")?,
            token_hash: column(row, "token_hash")?,
            user_id: uuid_column(row, "user_id")?,
            is_used: column(row, "is_used")?,
            expires_at: column(row, "expires_at")?,
            created_at: column(row, "created_at")?,
            used_at: column(row, "used_at")?,
        })
    }

    /// Attach the user's non-deleted emails, oldest first
    async fn hydrate(&self, mut user: User) -> Result<User, DomainError> {
        let query = format!(
            "SELECT {} FROM emails WHERE user_id = ? AND is_deleted = FALSE ORDER BY created_at ASC",
            EMAIL_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(user.id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("load user emails"))?;

        user.emails = rows
            .iter()
            .map(Self::row_to_email)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(user)
    }

    async fn find_user_row(&self, column_name: &str, value: String) -> Result<User, DomainError> {
        let query = format!(
            "SELECT id, username, password_hash, created_at FROM users WHERE {} = ? LIMIT 1",
            column_name
        );
        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("find user"))?
            .ok_or(AuthError::UserNotFound)?;

        Self::row_to_user(&row)
    }

    async fn username_taken(
        tx: &mut Transaction<'_, MySql>,
        username: &str,
    ) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS taken FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&mut **tx)
            .await
            .map_err(storage_error("check username"))?;
        let taken: i64 = column(&row, "taken")?;
        Ok(taken > 0)
    }

    async fn address_in_use(
        tx: &mut Transaction<'_, MySql>,
        address: &str,
    ) -> Result<bool, DomainError> {
        // Locking read: gap locks on the address index serialize concurrent claims
        let row = sqlx::query(
            "SELECT COUNT(*) AS in_use FROM emails WHERE address = ? AND is_deleted = FALSE FOR UPDATE",
        )
        .bind(address)
        .fetch_one(&mut **tx)
        .await
        .map_err(storage_error("check email address"))?;
        let in_use: i64 = column(&row, "in_use")?;
        Ok(in_use > 0)
    }

    async fn insert_email(
        tx: &mut Transaction<'_, MySql>,
        email: &Email,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO emails (
                id, user_id, address, is_primary, is_deleted, deleted_at, verified_at, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(email.id.to_string())
        .bind(email.user_id.to_string())
        .bind(&email.address)
        .bind(email.is_primary)
        .bind(email.is_deleted)
        .bind(email.deleted_at)
        .bind(email.verified_at)
        .bind(email.created_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            // uq_emails_active_address is the only secondary unique key on emails
            if is_unique_violation(&e) {
                AuthError::EmailAlreadyExists.into()
            } else {
                storage_error("insert email")(e)
            }
        })?;
        Ok(())
    }

    /// Whether a row with this id exists in `table`, used to tell a consumed
    /// token from a missing one after a conditional update matched nothing
    async fn token_exists(&self, table: &'static str, token_id: Uuid) -> Result<bool, DomainError> {
        let query = format!("SELECT COUNT(*) AS found FROM {} WHERE id = ?", table);
        let row = sqlx::query(&query)
            .bind(token_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error("check token"))?;
        let found: i64 = column(&row, "found")?;
        Ok(found > 0)
    }

    /// Invalidate without consuming: `used_at` stays empty
    async fn revoke(&self, table: &'static str, token_id: Uuid) -> Result<bool, DomainError> {
        let query = format!("UPDATE {} SET is_used = TRUE WHERE id = ? AND is_used = FALSE", table);
        let result = sqlx::query(&query)
            .bind(token_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage_error("revoke token"))?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }
        self.token_exists(table, token_id).await
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn create_user(&self, user: User) -> Result<User, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error("begin transaction"))?;

        if Self::username_taken(&mut tx, &user.username).await? {
            return Err(AuthError::UsernameAlreadyExists.into());
        }
        for email in &user.emails {
            if Self::address_in_use(&mut tx, &email.address).await? {
                return Err(AuthError::EmailAlreadyExists.into());
            }
        }
        if user.active_primary_count() != 1 {
            return Err(AuthError::PrimaryEmailRequired.into());
        }

        sqlx::query(
            "INSERT INTO users (id, username, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AuthError::UsernameAlreadyExists.into()
            } else {
                storage_error("insert user")(e)
            }
        })?;

        let mut emails = Vec::with_capacity(user.emails.len());
        for email in &user.emails {
            let email = Email {
                user_id: user.id,
                ..email.clone()
            };
            Self::insert_email(&mut tx, &email).await?;
            if email.is_active() {
                emails.push(email);
            }
        }

        tx.commit()
            .await
            .map_err(storage_error("commit user creation"))?;

        tracing::debug!(event = "user_persisted", user_id = %user.id);
        Ok(User { emails, ..user })
    }

    async fn get_user(&self, username: &str) -> Result<User, DomainError> {
        let user = self.find_user_row("username", username.to_string()).await?;
        self.hydrate(user).await
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Result<User, DomainError> {
        let user = self.find_user_row("id", user_id.to_string()).await?;
        self.hydrate(user).await
    }

    async fn update_password(
        &self,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage_error("update password"))?;

        if result.rows_affected() == 0 {
            // Unchanged rows count as unaffected on some server settings
            self.find_user_row("id", user_id.to_string()).await?;
        }
        Ok(())
    }

    async fn update_username(&self, current: &str, new: &str) -> Result<User, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error("begin transaction"))?;

        let row = sqlx::query("SELECT id FROM users WHERE username = ? FOR UPDATE")
            .bind(current)
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage_error("find user"))?
            .ok_or(AuthError::UserNotFound)?;
        let user_id = uuid_column(&row, "id")?;

        if Self::username_taken(&mut tx, new).await? {
            return Err(AuthError::UsernameAlreadyExists.into());
        }

        sqlx::query("UPDATE users SET username = ? WHERE id = ?")
            .bind(new)
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AuthError::UsernameAlreadyExists.into()
                } else {
                    storage_error("update username")(e)
                }
            })?;

        tx.commit()
            .await
            .map_err(storage_error("commit username change"))?;

        self.get_user_by_id(user_id).await
    }

    async fn create_email(&self, email: Email) -> Result<Email, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error("begin transaction"))?;

        let owner = sqlx::query("SELECT id FROM users WHERE id = ? FOR UPDATE")
            .bind(email.user_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage_error("find user"))?;
        if owner.is_none() {
            return Err(AuthError::UserNotFound.into());
        }
        if Self::address_in_use(&mut tx, &email.address).await? {
            return Err(AuthError::EmailAlreadyExists.into());
        }

        Self::insert_email(&mut tx, &email).await?;
        tx.commit()
            .await
            .map_err(storage_error("commit email creation"))?;
        Ok(email)
    }

    async fn delete_email(&self, email_id: Uuid, user_id: Uuid) -> Result<(), DomainError> {
        let row = sqlx::query(
            "SELECT is_primary FROM emails WHERE id = ? AND user_id = ? AND is_deleted = FALSE",
        )
        .bind(email_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("find email"))?
        .ok_or(AuthError::EmailNotFound)?;

        let is_primary: bool = column(&row, "is_primary")?;
        if is_primary {
            return Err(AuthError::PrimaryEmailRequired.into());
        }

        let result = sqlx::query(
            r#"
            UPDATE emails
            SET is_deleted = TRUE, deleted_at = ?
            WHERE id = ? AND user_id = ? AND is_deleted = FALSE AND is_primary = FALSE
            "#,
        )
        .bind(Utc::now())
        .bind(email_id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(storage_error("delete email"))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::EmailNotFound.into());
        }
        Ok(())
    }

    async fn get_email(&self, address: &str) -> Result<Email, DomainError> {
        let query = format!(
            "SELECT {} FROM emails WHERE address = ? AND is_deleted = FALSE LIMIT 1",
            EMAIL_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(address)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("find email"))?
            .ok_or(AuthError::EmailNotFound)?;

        Self::row_to_email(&row)
    }

    async fn get_verified_email(&self, address: &str) -> Result<Email, DomainError> {
        let query = format!(
            r#"
            SELECT {} FROM emails
            WHERE address = ? AND is_deleted = FALSE AND verified_at IS NOT NULL
            LIMIT 1
            "#,
            EMAIL_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(address)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("find verified email"))?
            .ok_or(AuthError::EmailNotVerified)?;

        Self::row_to_email(&row)
    }

    async fn create_verified_email_token(
        &self,
        token: VerifiedEmailToken,
    ) -> Result<VerifiedEmailToken, DomainError> {
        let query = format!(
            "INSERT INTO verified_email_tokens ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            EMAIL_TOKEN_COLUMNS
        );
        sqlx::query(&query)
            .bind(token.id.to_string())
            .bind(&token.token_hash)
            .bind(token.email_id.to_string())
            .bind(token.user_id.to_string())
            .bind(token.is_used)
            .bind(token.expires_at)
            .bind(token.created_at)
            .bind(token.used_at)
            .execute(&self.pool)
            .await
            .map_err(storage_error("insert verification token"))?;

        Ok(token)
    }

    async fn get_verified_email_token(
        &self,
        address: &str,
    ) -> Result<VerifiedEmailToken, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT t.id, t.token_hash, t.email_id, t.user_id, t.is_used,
                   t.expires_at, t.created_at, t.used_at
            FROM verified_email_tokens t
            JOIN emails e ON e.id = t.email_id
            WHERE e.address = ?
                AND e.is_deleted = FALSE
                AND t.is_used = FALSE
                AND t.expires_at > ?
            ORDER BY t.created_at DESC
            LIMIT 1
            "#,
        )
        .bind(address)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("find verification token"))?
        .ok_or(TokenError::VerificationTokenNotFound)?;

        Self::row_to_email_token(&row)
    }

    async fn confirm_email(&self, email_id: Uuid, token_id: Uuid) -> Result<(), DomainError> {
        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error("begin transaction"))?;

        let consumed = sqlx::query(
            r#"
            UPDATE verified_email_tokens
            SET is_used = TRUE, used_at = ?
            WHERE id = ? AND is_used = FALSE
            "#,
        )
        .bind(now)
        .bind(token_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(storage_error("consume verification token"))?;

        if consumed.rows_affected() != 1 {
            drop(tx);
            return Err(if self.token_exists("verified_email_tokens", token_id).await? {
                TokenError::TokenAlreadyUsed.into()
            } else {
                TokenError::VerificationTokenNotFound.into()
            });
        }

        let verified = sqlx::query(
            "UPDATE emails SET verified_at = ? WHERE id = ? AND is_deleted = FALSE",
        )
        .bind(now)
        .bind(email_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(storage_error("mark email verified"))?;

        if verified.rows_affected() == 0 {
            // Rolled back on drop, the token stays unused
            return Err(AuthError::EmailNotFound.into());
        }

        tx.commit()
            .await
            .map_err(storage_error("commit email confirmation"))?;
        Ok(())
    }

    async fn revoke_verified_email_token(&self, token_id: Uuid) -> Result<(), DomainError> {
        if !self.revoke("verified_email_tokens", token_id).await? {
            return Err(TokenError::VerificationTokenNotFound.into());
        }
        Ok(())
    }

    async fn create_password_reset_token(
        &self,
        token: PasswordResetToken,
    ) -> Result<PasswordResetToken, DomainError> {
        let query = format!(
            "INSERT INTO password_reset_tokens ({}) VALUES (?, ?, ?, ?, ?, ?, ?)",
            RESET_TOKEN_COLUMNS
        );
        sqlx::query(&query)
            .bind(token.id.to_string())
            .bind(&token.token_hash)
            .bind(token.user_id.to_string())
            .bind(token.is_used)
            .bind(token.expires_at)
            .bind(token.created_at)
            .bind(token.used_at)
            .execute(&self.pool)
            .await
            .map_err(storage_error("insert reset token"))?;

        Ok(token)
    }

    async fn get_password_reset_token(
        &self,
        token_hash: &str,
    ) -> Result<PasswordResetToken, DomainError> {
        let query = format!(
            r#"
            SELECT {} FROM password_reset_tokens
            WHERE token_hash = ? AND is_used = FALSE AND expires_at > ?
            ORDER BY created_at DESC
            LIMIT 1
            "#,
            RESET_TOKEN_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(token_hash)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("find reset token"))?;

        if let Some(row) = row {
            return Self::row_to_reset_token(&row);
        }

        let used = sqlx::query(
            "SELECT COUNT(*) AS used FROM password_reset_tokens WHERE token_hash = ? AND is_used = TRUE",
        )
        .bind(token_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error("check reset token"))?;
        let used: i64 = column(&used, "used")?;

        if used > 0 {
            Err(TokenError::TokenAlreadyUsed.into())
        } else {
            Err(TokenError::TokenNotFound.into())
        }
    }

    async fn confirm_password_reset_token(&self, token_id: Uuid) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE password_reset_tokens
            SET is_used = TRUE, used_at = ?
            WHERE id = ? AND is_used = FALSE
            "#,
        )
        .bind(Utc::now())
        .bind(token_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(storage_error("consume reset token"))?;

        if result.rows_affected() == 1 {
            return Ok(());
        }
        if self.token_exists("password_reset_tokens", token_id).await? {
            Err(TokenError::TokenAlreadyUsed.into())
        } else {
            Err(TokenError::TokenNotFound.into())
        }
    }

    async fn revoke_password_reset_token(&self, token_id: Uuid) -> Result<(), DomainError> {
        if !self.revoke("password_reset_tokens", token_id).await? {
            return Err(TokenError::TokenNotFound.into());
        }
        Ok(())
    }
}
