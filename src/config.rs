//! Configuration loading
//!
//! Loads database connection configuration from environment variables,
//! optionally reading from a .env file first.

use crate::prelude::NavigatorError;
use std::{env, path::Path};
use tracing::{debug, error, trace, warn};

const DEFAULT_POOL_SIZE: usize = 16;

/// Database connection configuration
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    /// Maximum number of pooled connections
    pub pool_size: usize,
}

impl DbConfig {
    /// Load configuration from environment variables
    ///
    /// Expected variables:
    /// - DB_HOST (default: localhost)
    /// - DB_PORT (default: 5432)
    /// - DB_NAME (required)
    /// - DB_USER (required)
    /// - DB_PASSWORD (required)
    /// - DB_POOL_SIZE (default: 16)
    pub fn from_env() -> Result<Self, NavigatorError> {
        debug!("Loading database configuration from environment");

        let host = env::var("DB_HOST").unwrap_or_else(|_| {
            trace!("DB_HOST not set, using default");
            "localhost".to_string()
        });

        let port_str = env::var("DB_PORT").unwrap_or_else(|_| {
            trace!("DB_PORT not set, using default");
            "5432".to_string()
        });

        let port = port_str.parse::<u16>().map_err(|e| {
            error!(port = ?port_str, error = ?e, "Invalid DB_PORT value");
            NavigatorError::Config("DB_PORT must be a valid port number".to_string())
        })?;

        let database = env::var("DB_NAME").map_err(|_| {
            error!("DB_NAME environment variable is not set");
            NavigatorError::Config("DB_NAME environment variable is required".to_string())
        })?;

        let user = env::var("DB_USER").map_err(|_| {
            error!("DB_USER environment variable is not set");
            NavigatorError::Config("DB_USER environment variable is required".to_string())
        })?;

        let password = env::var("DB_PASSWORD").map_err(|_| {
            error!("DB_PASSWORD environment variable is not set");
            NavigatorError::Config("DB_PASSWORD environment variable is required".to_string())
        })?;

        let pool_size = match env::var("DB_POOL_SIZE") {
            Ok(value) => match value.parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => {
                    error!(pool_size = ?value, "Invalid DB_POOL_SIZE value");
                    return Err(NavigatorError::Config(
                        "DB_POOL_SIZE must be a positive integer".to_string(),
                    ));
                }
            },
            Err(_) => {
                trace!("DB_POOL_SIZE not set, using default");
                DEFAULT_POOL_SIZE
            }
        };

        debug!(
            host = ?host,
            port = ?port,
            database = ?database,
            user = ?user,
            pool_size = ?pool_size,
            "Configuration loaded"
        );

        Ok(Self {
            host,
            port,
            database,
            user,
            password,
            pool_size,
        })
    }

    /// Load a .env file and then read configuration from environment
    pub fn load(env_file: &Path) -> Result<Self, NavigatorError> {
        if env_file.exists() {
            debug!(path = ?env_file, "Loading environment file");
            dotenvy::from_path(env_file).map_err(|e| {
                error!(path = ?env_file, error = ?e, "Failed to load environment file");
                NavigatorError::Config(format!("Failed to load {}: {}", env_file.display(), e))
            })?;
        } else {
            warn!(path = ?env_file, "Environment file not found, using existing environment");
        }

        Self::from_env()
    }

    /// Build a PostgreSQL connection string
    pub fn postgres_connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={}",
            self.host, self.port, self.database, self.user, self.password
        )
    }

    /// Build a connection string with password redacted (for error messages)
    pub fn redacted_connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password=***",
            self.host, self.port, self.database, self.user
        )
    }
}
