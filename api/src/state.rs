//! Application state and dependency construction
//!
//! Everything the handlers need is built here, explicitly, from
//! [`AppConfig`] sections. There is no container: each service receives its
//! collaborators through its constructor.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tg_core::services::{
    AccountService, AccountServiceConfig, GroupService, PasswordHasher, PasswordHasherConfig,
    TaskService, TokenService, TokenServiceConfig,
};
use tg_infra::database::{
    DatabasePool, MySqlGroupRepository, MySqlTaskRepository, MySqlUserRepository,
};
use tg_infra::mail::{create_mail_service, create_mail_service_or_mock, MailServiceAdapter};
use tg_shared::config::{AppConfig, AuthConfig};
use tg_shared::ServiceHealth;

/// Account use cases over MySQL and the configured mail provider
pub type Accounts = AccountService<MySqlUserRepository, MailServiceAdapter>;

/// Use-case services shared by every worker
pub struct AppState {
    pub accounts: Arc<Accounts>,
    pub tasks: Arc<TaskService<MySqlTaskRepository>>,
    pub groups: Arc<GroupService<MySqlGroupRepository>>,
}

impl AppState {
    /// Wire repositories, hasher, token service and use cases
    pub fn build(config: &AppConfig, pool: &DatabasePool, mail: MailServiceAdapter) -> Self {
        let users = Arc::new(MySqlUserRepository::new(pool.get_pool().clone()));
        let tasks = Arc::new(MySqlTaskRepository::new(pool.get_pool().clone()));
        let groups = Arc::new(MySqlGroupRepository::new(pool.get_pool().clone()));

        let password_hasher = Arc::new(PasswordHasher::new(password_hasher_config(&config.auth)));
        let token_service = Arc::new(TokenService::new(token_service_config(&config.auth)));

        let accounts = AccountService::new(
            users,
            Arc::new(mail),
            password_hasher,
            token_service,
            account_service_config(&config.auth),
        );

        Self {
            accounts: Arc::new(accounts),
            tasks: Arc::new(TaskService::new(tasks)),
            groups: Arc::new(GroupService::new(groups)),
        }
    }
}

/// Build the configured mail provider
///
/// Production refuses to start on a broken provider; other environments
/// fall back to the mock outbox.
pub fn mail_service(config: &AppConfig) -> anyhow::Result<MailServiceAdapter> {
    let service = if config.environment.is_production() {
        create_mail_service(&config.mail)
            .map_err(|e| anyhow::anyhow!("refusing to start in production: {}", e))?
    } else {
        create_mail_service_or_mock(&config.mail)
    };
    Ok(MailServiceAdapter::new(service))
}

pub fn password_hasher_config(auth: &AuthConfig) -> PasswordHasherConfig {
    PasswordHasherConfig {
        pepper: auth.password_pepper.clone(),
        cost: auth.bcrypt_cost,
        min_length: auth.password_min_length,
    }
}

pub fn token_service_config(auth: &AuthConfig) -> TokenServiceConfig {
    TokenServiceConfig::new(auth.token_secret.clone())
        .with_default_expiry_minutes(auth.token_expiry_minutes)
}

pub fn account_service_config(auth: &AuthConfig) -> AccountServiceConfig {
    AccountServiceConfig {
        username_min_length: auth.username_min_length,
        password_min_length: auth.password_min_length,
        ..AccountServiceConfig::default()
    }
    .with_base_url(auth.base_url.clone())
}

/// A dependency reported by `/health`
#[async_trait]
pub trait DependencyCheck: Send + Sync {
    /// Key under `services` in the health response
    fn name(&self) -> &str;

    /// A failing critical dependency turns the endpoint into a 503
    fn is_critical(&self) -> bool {
        true
    }

    async fn check(&self) -> ServiceHealth;
}

/// Dependencies probed by `/health`
#[derive(Clone)]
pub struct HealthState {
    pub checks: Vec<Arc<dyn DependencyCheck>>,
    pub version: String,
}

impl HealthState {
    pub fn new(checks: Vec<Arc<dyn DependencyCheck>>) -> Self {
        Self {
            checks,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

pub struct DatabaseCheck {
    pool: DatabasePool,
}

impl DatabaseCheck {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DependencyCheck for DatabaseCheck {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> ServiceHealth {
        let started = Instant::now();
        match self.pool.health_check().await {
            Ok(true) => ServiceHealth::healthy(started.elapsed().as_millis() as u64),
            Ok(false) => ServiceHealth::unhealthy("unexpected health check result"),
            Err(e) => ServiceHealth::unhealthy(e.to_string()),
        }
    }
}

/// Mail provider reachability; reported as `degraded`, never a 503
pub struct MailCheck {
    mail: MailServiceAdapter,
}

impl MailCheck {
    pub fn new(mail: MailServiceAdapter) -> Self {
        Self { mail }
    }
}

#[async_trait]
impl DependencyCheck for MailCheck {
    fn name(&self) -> &str {
        "mail"
    }

    fn is_critical(&self) -> bool {
        false
    }

    async fn check(&self) -> ServiceHealth {
        let started = Instant::now();
        if self.mail.is_available().await {
            ServiceHealth::healthy(started.elapsed().as_millis() as u64)
        } else {
            ServiceHealth::degraded(format!("{} provider unreachable", self.mail.provider_name()))
        }
    }
}
