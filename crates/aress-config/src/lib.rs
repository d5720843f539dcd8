//! # Aress Config
//!
//! Configuration types for the Aress CRM API, loaded from environment
//! variables (a `.env` file is honoured by the binaries through `dotenvy`).
//!
//! - [`backend`]: hosted auth service and Postgres connection settings
//! - [`jwt`]: optional local access-token verification
//! - [`cors`]: allowed browser origins
//! - [`cleanup`]: retry policy for orphaned profile cleanup
//! - [`server`]: listen address
//!
//! Every `from_env` constructor has a `from_vars` twin that takes a lookup
//! function, which is what the tests use.
//!
//! # Example
//!
//! ```ignore
//! use aress_config::{BackendConfig, CorsConfig};
//!
//! let backend = BackendConfig::from_env()?;
//! let cors = CorsConfig::from_env();
//! ```

pub mod backend;
pub mod cleanup;
pub mod cors;
pub mod error;
pub mod jwt;
pub mod server;

pub use backend::{BackendConfig, DatabaseConfig};
pub use cleanup::CleanupConfig;
pub use cors::CorsConfig;
pub use error::ConfigError;
pub use jwt::JwtConfig;
pub use server::ServerConfig;

/// Reads `key` through `lookup` and parses it, falling back to `default` when
/// the variable is unset or unparseable.
pub(crate) fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

pub(crate) fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
