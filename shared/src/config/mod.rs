//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical business areas:
//! - `auth` - Password hashing, one-time token signing and link building
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `mail` - Outgoing mail transport
//! - `server` - HTTP server binding

pub mod auth;
pub mod database;
pub mod environment;
pub mod mail;
pub mod server;

use ::config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use mail::MailConfig;
pub use server::ServerConfig;

/// Prefix for environment variables read by [`AppConfig::load`]
/// (`TASKGROUP__DATABASE__URL`, `TASKGROUP__AUTH__TOKEN_SECRET`, ...)
pub const ENV_PREFIX: &str = "TASKGROUP";

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Password, token and link configuration
    pub auth: AuthConfig,

    /// Mail transport configuration
    pub mail: MailConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            mail: MailConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Build configuration from plain environment variables
    ///
    /// Every value has a development default, so a bare checkout starts
    /// without any `.env` file.
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            auth: AuthConfig::from_env(),
            mail: MailConfig::from_env(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Load layered configuration
    ///
    /// Layers, lowest precedence first:
    /// 1. [`AppConfig::from_env`] values
    /// 2. the environment's TOML file (`config.development.toml`, ...), if present
    /// 3. `TASKGROUP__SECTION__KEY` environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let base = Self::from_env();
        let config_file = base.environment.config_file().to_string();

        Config::builder()
            .add_source(Config::try_from(&base)?)
            .add_source(File::new(&config_file, FileFormat::Toml).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Configuration problems that must stop a production start
    pub fn production_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.auth.is_using_default_secret() {
            warnings.push("auth.token_secret is the development default".to_string());
        }
        if self.auth.password_pepper.is_none() {
            warnings.push("auth.password_pepper is not set".to_string());
        }
        if self.mail.provider == "mock" {
            warnings.push("mail.provider is 'mock'; no mail will be delivered".to_string());
        }
        warnings
    }
}
