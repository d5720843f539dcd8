//! Connection settings for the hosted backend platform.
//!
//! The auth service is reached over HTTP with the project's service-role key.
//! The profile table lives in the platform's Postgres database and is reached
//! directly through a connection pool.
//!
//! # Environment Variables
//!
//! - `SUPABASE_URL` (required): project base URL, e.g. `https://xyz.supabase.co`
//! - `SUPABASE_SERVICE_ROLE_KEY` (required): privileged API key
//! - `BACKEND_TIMEOUT_SECS`: HTTP timeout for auth-service calls (default: 10)
//! - `DATABASE_URL` (required): Postgres connection string
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default: 5)
//! - `DATABASE_RUN_MIGRATIONS`: apply bundled migrations on startup (default: false)

use std::time::Duration;

use secrecy::SecretString;

use crate::{ConfigError, env_lookup, parse_or};

#[derive(Clone, Debug)]
pub struct BackendConfig {
    /// Base URL without a trailing slash.
    pub url: String,
    pub service_role_key: SecretString,
    pub request_timeout: Duration,
}

impl BackendConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(env_lookup)
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("SUPABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("SUPABASE_URL"))?;

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "SUPABASE_URL",
                reason: "expected an http(s) URL".to_string(),
            });
        }

        let service_role_key = lookup("SUPABASE_SERVICE_ROLE_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("SUPABASE_SERVICE_ROLE_KEY"))?;

        Ok(Self {
            url: url.trim().trim_end_matches('/').to_string(),
            service_role_key: SecretString::from(service_role_key),
            request_timeout: Duration::from_secs(parse_or(&lookup, "BACKEND_TIMEOUT_SECS", 10)),
        })
    }
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: SecretString,
    pub max_connections: u32,
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(env_lookup)
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            url: SecretString::from(url),
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5),
            run_migrations: parse_or(&lookup, "DATABASE_RUN_MIGRATIONS", false),
        })
    }
}
