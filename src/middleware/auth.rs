use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::{debug, warn};

use aress_auth::{jwt::INVALID_TOKEN_MESSAGE, parse_bearer, verify_token};
use aress_core::AppError;
use aress_models::{Identity, Profile, UserId};

use crate::state::AppState;

/// Forbidden message on the delete endpoint.
pub const DELETE_FORBIDDEN_MESSAGE: &str = "Only admins can delete users";
/// Forbidden message on every other admin endpoint.
pub const MANAGE_FORBIDDEN_MESSAGE: &str = "Only admins can manage users";

/// The raw bearer token. Extraction only checks the header shape and never
/// contacts a store.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        parse_bearer(header).map(|token| BearerToken(token.to_string()))
    }
}

/// Resolves the identity behind `token`.
///
/// When a JWT secret is configured the signature, expiry and audience are
/// checked first, and a token that fails is rejected without a network call.
/// The auth service is always asked in the end, since a signed token can
/// outlive its session.
pub async fn authenticate(state: &AppState, token: &str) -> Result<Identity, AppError> {
    let local_subject = match state.jwt_config.secret {
        Some(_) => Some(verify_token(token, &state.jwt_config)?.user_id()),
        None => None,
    };

    let identity = state.identities.verify_credential(token).await?;

    if local_subject.is_some_and(|subject| subject != Some(identity.id.into_inner())) {
        warn!(user_id = %identity.id, "Token subject does not match the resolved identity");
        return Err(AppError::unauthorized(INVALID_TOKEN_MESSAGE));
    }

    debug!(user_id = %identity.id, "Caller authenticated");
    Ok(identity)
}

/// Loads the caller's profile and checks that it carries the admin role.
/// A caller without a profile is treated like a non-admin.
pub async fn require_admin(
    state: &AppState,
    caller: UserId,
    forbidden_message: &'static str,
) -> Result<Profile, AppError> {
    match state.profiles.get_profile(caller).await? {
        Some(profile) if profile.role.is_admin() => Ok(profile),
        Some(profile) => {
            warn!(user_id = %caller, role = %profile.role, "Admin action refused");
            Err(AppError::forbidden(forbidden_message))
        }
        None => {
            warn!(user_id = %caller, "Admin action refused: caller has no profile");
            Err(AppError::forbidden(forbidden_message))
        }
    }
}

/// Any caller with a live session.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl AuthUser {
    pub fn id(&self) -> UserId {
        self.0.id
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let identity = authenticate(state, &token).await?;
        Ok(AuthUser(identity))
    }
}

/// A caller whose profile role is `admin`.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub identity: Identity,
    pub profile: Profile,
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(identity) = AuthUser::from_request_parts(parts, state).await?;
        let profile = require_admin(state, identity.id, MANAGE_FORBIDDEN_MESSAGE).await?;
        Ok(AdminUser { identity, profile })
    }
}
