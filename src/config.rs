//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::db::PoolSettings;

/// Database cluster configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Primary (write) connection URL
    pub primary_url: String,

    /// Replica (read) connection URLs, possibly empty
    pub replica_urls: Vec<String>,

    /// Pool bounds for the primary
    pub primary_pool: PoolSettings,

    /// Pool bounds for each replica
    pub replica_pool: PoolSettings,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database cluster
    pub database: DatabaseConfig,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let primary_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnv("DATABASE_URL"))?;

        let replica_urls = env::var("DATABASE_REPLICA_URLS")
            .map(|value| parse_url_list(&value))
            .unwrap_or_default();

        let idle_timeout = Duration::from_secs(parse_env("DATABASE_IDLE_TIMEOUT_SECS", 30)?);
        let acquire_timeout =
            Duration::from_secs(parse_env("DATABASE_ACQUIRE_TIMEOUT_SECS", 30)?);

        let primary_pool = pool_settings(
            "DATABASE_PRIMARY_MIN_CONNECTIONS",
            100,
            "DATABASE_PRIMARY_MAX_CONNECTIONS",
            150,
        )?
        .with_idle_timeout(idle_timeout)
        .with_acquire_timeout(acquire_timeout);

        let replica_pool = pool_settings(
            "DATABASE_REPLICA_MIN_CONNECTIONS",
            50,
            "DATABASE_REPLICA_MAX_CONNECTIONS",
            100,
        )?
        .with_idle_timeout(idle_timeout)
        .with_acquire_timeout(acquire_timeout);

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_env("PORT", 8080)?;
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        Ok(Self {
            database: DatabaseConfig {
                primary_url,
                replica_urls,
                primary_pool,
                replica_pool,
            },
            host,
            port,
            environment,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Split a comma-separated list, dropping blanks
fn parse_url_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_env<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue(name)),
        Err(_) => Ok(default),
    }
}

fn pool_settings(
    min_name: &'static str,
    min_default: u32,
    max_name: &'static str,
    max_default: u32,
) -> Result<PoolSettings, ConfigError> {
    let min = parse_env(min_name, min_default)?;
    let max = parse_env(max_name, max_default)?;

    if max == 0 || min > max {
        return Err(ConfigError::InvalidPoolBounds {
            min_var: min_name,
            max_var: max_name,
        });
    }

    Ok(PoolSettings::new(min, max))
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),

    #[error("{min_var} must not exceed {max_var}, and {max_var} must be positive")]
    InvalidPoolBounds {
        min_var: &'static str,
        max_var: &'static str,
    },
}
