//! Configuration module for loading and parsing TOML configuration files.

use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "LIGHTBNB_CONFIG";

/// Configuration file used when [`CONFIG_PATH_ENV`] is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config/lightbnb.toml";

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse TOML configuration.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Invalid configuration value.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Relational store connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Property search settings.
    #[serde(default)]
    pub search: SearchConfig,
}

/// Relational store connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Role used to connect.
    pub user: String,
    /// Password for the role.
    pub password: String,
    /// Host name of the PostgreSQL server.
    pub host: String,
    /// Port of the PostgreSQL server.
    pub port: u16,
    /// Database name.
    pub database: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// Seconds to wait for a free pooled connection.
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            user: "labber".to_string(),
            password: "labber".to_string(),
            host: "localhost".to_string(),
            port: 5432,
            database: "lightbnb".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 5,
        }
    }
}

impl DatabaseConfig {
    /// Builds the sqlx connection options for these settings.
    #[must_use]
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }

    /// Pool acquire timeout as a [`Duration`].
    #[must_use]
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

/// Property search settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Row cap applied when a caller does not pass one.
    pub default_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: crate::DEFAULT_LIMIT,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file.
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Loads configuration from the path in `LIGHTBNB_CONFIG`, falling back to
    /// [`DEFAULT_CONFIG_PATH`].
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(path)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Arguments
    /// * `content` - TOML content as string.
    ///
    /// # Errors
    /// Returns error if content cannot be parsed.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        let db = &self.database;
        if db.user.is_empty() {
            return Err(ConfigError::InvalidValue(
                "database user cannot be empty".to_string(),
            ));
        }
        if db.host.is_empty() {
            return Err(ConfigError::InvalidValue(
                "database host cannot be empty".to_string(),
            ));
        }
        if db.database.is_empty() {
            return Err(ConfigError::InvalidValue(
                "database name cannot be empty".to_string(),
            ));
        }
        if db.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "database max_connections must be positive".to_string(),
            ));
        }
        if self.search.default_limit == 0 {
            return Err(ConfigError::InvalidValue(
                "search default_limit must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
