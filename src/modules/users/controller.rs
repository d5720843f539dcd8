use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use aress_core::{AppError, DataResponse, ErrorResponse};
use aress_models::{CurrentUser, Profile, UpdateUserDto, UserId};

use crate::middleware::auth::{AdminUser, AuthUser};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List all user profiles, newest first (admin only)
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All profiles", body = DataResponse<Vec<Profile>>),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip_all)]
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<DataResponse<Vec<Profile>>>, AppError> {
    let users = UserService::list_users(state.profiles.as_ref()).await?;
    Ok(Json(DataResponse::ok(users)))
}

/// Change a user's name or role (admin only)
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(
        ("id" = String, Path, description = "User id")
    ),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "Updated profile", body = DataResponse<Profile>),
        (status = 400, description = "Invalid id or body", body = ErrorResponse),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, admin, dto), fields(admin = %admin.identity.id))]
pub async fn update_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<DataResponse<Profile>>, AppError> {
    let id = UserId::parse(&id).map_err(|e| AppError::bad_request(e.to_string()))?;
    let profile = UserService::update_user(state.profiles.as_ref(), id, dto.into()).await?;
    Ok(Json(DataResponse::ok(profile)))
}

/// The caller's profile and permissions
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = DataResponse<CurrentUser>),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse),
        (status = 404, description = "No profile for this identity", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip_all, fields(user_id = %auth_user.id()))]
pub async fn get_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<DataResponse<CurrentUser>>, AppError> {
    let profile = UserService::get_user(state.profiles.as_ref(), auth_user.id()).await?;
    Ok(Json(DataResponse::ok(profile.into())))
}

/// Create or refresh the caller's profile after sign-in
#[utoipa::path(
    post,
    path = "/api/users/me/sync",
    responses(
        (status = 200, description = "Current user", body = DataResponse<CurrentUser>),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip_all, fields(user_id = %auth_user.id()))]
pub async fn sync_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<DataResponse<CurrentUser>>, AppError> {
    let profile = UserService::sync_profile(state.profiles.as_ref(), &auth_user.0).await?;
    Ok(Json(DataResponse::ok(profile.into())))
}
