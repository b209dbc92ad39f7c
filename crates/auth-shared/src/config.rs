//! Configuration management

use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::{
    DEFAULT_RENEW_LIFESPAN_SECS, DEFAULT_SWEEP_INTERVAL_SECS, DEFAULT_TOKEN_LIFESPAN_SECS,
};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    /// Lifetime of a newly issued session.
    pub token_lifespan_secs: u64,
    /// Lifetime granted on each successful validation.
    pub renew_lifespan_secs: u64,
    /// Period of the background sweeper; 0 disables it.
    pub sweep_interval_secs: u64,
    /// Snowflake node id, 0..=1023.
    pub node_id: u16,
    pub cookie_secure: bool,
}

impl AuthSettings {
    pub fn token_lifespan(&self) -> Duration {
        Duration::from_secs(self.token_lifespan_secs)
    }

    pub fn renew_lifespan(&self) -> Duration {
        Duration::from_secs(self.renew_lifespan_secs)
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.token_lifespan_secs == 0 {
            return Err(AppError::InvalidSetting {
                key: "auth.token_lifespan_secs",
                reason: "must be greater than zero".into(),
            });
        }
        if self.renew_lifespan_secs == 0 {
            return Err(AppError::InvalidSetting {
                key: "auth.renew_lifespan_secs",
                reason: "must be greater than zero".into(),
            });
        }
        if self.node_id > 1023 {
            return Err(AppError::InvalidSetting {
                key: "auth.node_id",
                reason: format!("{} does not fit in 10 bits", self.node_id),
            });
        }
        Ok(())
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.auth.validate()?;
        Ok(config)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "auth-server")?
            .set_default("database.url", "sqlite:auth.db?mode=rwc")?
            .set_default("database.max_connections", 5)?
            .set_default("auth.token_lifespan_secs", DEFAULT_TOKEN_LIFESPAN_SECS)?
            .set_default("auth.renew_lifespan_secs", DEFAULT_RENEW_LIFESPAN_SECS)?
            .set_default("auth.sweep_interval_secs", DEFAULT_SWEEP_INTERVAL_SECS)?
            .set_default("auth.node_id", 0)?
            .set_default("auth.cookie_secure", true)
    }
}
