//! HS256 access-token verification against the project JWT secret.
//!
//! Verification checks the signature, the expiry and the audience. A token
//! whose signature cannot be verified is never trusted, not even for reading
//! its claims.

use anyhow::anyhow;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use uuid::Uuid;

use aress_config::JwtConfig;
use aress_core::AppError;

use crate::claims::Claims;

/// Message for a token that failed verification.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid token";

/// Issues an access token in the platform's format.
///
/// The API itself never issues tokens (the auth service does). This exists
/// for tooling and tests that need a token the verifier accepts.
///
/// # Errors
///
/// Returns an internal error if no secret is configured or encoding fails.
pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    ttl_seconds: i64,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let secret = jwt_config
        .secret
        .as_ref()
        .ok_or_else(|| AppError::internal(anyhow!("JWT secret is not configured")))?;

    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        email: Some(email.to_string()),
        role: Some("authenticated".to_string()),
        aud: jwt_config.audience.clone(),
        exp: (now + ttl_seconds).max(0) as usize,
        iat: now as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow!("Failed to create token: {}", e)))
}

/// Verifies a token's signature, expiry and audience.
///
/// # Errors
///
/// - Unauthorized ("Invalid token") when verification fails for any reason
/// - Internal when no secret is configured
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    let secret = jwt_config
        .secret
        .as_ref()
        .ok_or_else(|| AppError::internal(anyhow!("JWT secret is not configured")))?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[jwt_config.audience.as_str()]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized(INVALID_TOKEN_MESSAGE))
}
