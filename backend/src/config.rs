//! Application configuration loaded from environment variables.
//!
//! Resolved once at startup and passed to the components that need it through
//! [`crate::api::AppState`]. Business logic never reads the environment.

use crate::error::{AppError, Result};
use std::env;

/// Minimum length of the token signing secret, in bytes.
pub const MIN_AUTH_SECRET_LEN: usize = 32;

/// Application configuration
#[derive(Clone)]
pub struct Config {
    /// Database connection URL (e.g. `sqlite://data/galleria.db`)
    pub database_url: String,

    /// Maximum number of pooled database connections
    pub db_max_connections: u32,

    /// Server bind address (host:port)
    pub bind_address: String,

    /// Allowed CORS origin, `*` for any
    pub cors_origin: String,

    /// Deployment environment name ("production", "development", ...)
    pub environment: String,

    /// Shared secret used to verify session tokens issued by the auth provider
    pub auth_secret: String,

    /// bcrypt cost factor for gallery passwords
    pub bcrypt_cost: u32,
}

redacted_debug!(Config {
    show database_url,
    show db_max_connections,
    show bind_address,
    show cors_origin,
    show environment,
    redact auth_secret,
    show bcrypt_cost,
});

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url =
            get("DATABASE_URL").ok_or_else(|| AppError::Config("DATABASE_URL not set".into()))?;

        let auth_secret =
            get("AUTH_SECRET").ok_or_else(|| AppError::Config("AUTH_SECRET not set".into()))?;
        if auth_secret.len() < MIN_AUTH_SECRET_LEN {
            return Err(AppError::Config(format!(
                "AUTH_SECRET must be at least {} bytes",
                MIN_AUTH_SECRET_LEN
            )));
        }

        let db_max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| AppError::Config(format!("Invalid DB_MAX_CONNECTIONS: {}", v)))?,
            None => 10,
        };

        let bcrypt_cost = match get("BCRYPT_COST") {
            Some(v) => v
                .parse::<u32>()
                .ok()
                .filter(|c| (4..=31).contains(c))
                .ok_or_else(|| AppError::Config(format!("Invalid BCRYPT_COST: {}", v)))?,
            None => bcrypt::DEFAULT_COST,
        };

        Ok(Self {
            database_url,
            db_max_connections,
            bind_address: get("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".into()),
            cors_origin: get("CORS_ORIGIN").unwrap_or_else(|| "*".into()),
            environment: get("ENVIRONMENT").unwrap_or_else(|| "production".into()),
            auth_secret,
            bcrypt_cost,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
