//! # Aress Auth
//!
//! Bearer-credential handling for the Aress CRM API.
//!
//! - [`bearer`]: extracting the token from an `Authorization` header
//! - [`claims`]: the claim set carried by the platform's access tokens
//! - [`jwt`]: signature verification against the project JWT secret
//!
//! Local verification is an optional first filter. The auth service remains
//! the authority on whether a session is still valid.
//!
//! # Example
//!
//! ```ignore
//! use aress_auth::{parse_bearer, verify_token};
//! use aress_config::JwtConfig;
//!
//! let token = parse_bearer(headers.get("authorization").and_then(|v| v.to_str().ok()))?;
//! let claims = verify_token(token, &JwtConfig::from_env())?;
//! ```

pub mod bearer;
pub mod claims;
pub mod jwt;

pub use bearer::parse_bearer;
pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
