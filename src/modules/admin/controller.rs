use axum::{Json, extract::State};
use tracing::instrument;

use aress_core::{AppError, DataResponse, ErrorResponse, SuccessResponse};
use aress_models::{DeleteUserRequest, SweepReport, UserId};

use crate::middleware::auth::{
    AdminUser, BearerToken, DELETE_FORBIDDEN_MESSAGE, authenticate, require_admin,
};
use crate::modules::admin::service::{DeleteUser, sweep_orphans as run_sweep};
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Delete a user's identity and profile (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/delete-user",
    request_body = DeleteUserRequest,
    responses(
        (status = 200, description = "User deleted", body = SuccessResponse),
        (status = 400, description = "Missing or invalid userId, or rejected upstream", body = ErrorResponse),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
#[instrument(skip_all)]
pub async fn delete_user(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    ValidatedJson(body): ValidatedJson<DeleteUserRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let target = body
        .user_id
        .as_deref()
        .map(UserId::parse)
        .transpose()
        .map_err(|e| AppError::bad_request(e.to_string()))?
        .ok_or_else(|| AppError::bad_request("userId is required"))?;

    let caller = authenticate(&state, &token).await?;
    require_admin(&state, caller.id, DELETE_FORBIDDEN_MESSAGE).await?;

    tracing::info!(caller = %caller.id, target = %target, "Admin requested user deletion");
    DeleteUser::from_state(&state).execute(target).await?;

    Ok(Json(SuccessResponse::ok()))
}

/// Remove profiles whose identity no longer exists (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/sweep-orphans",
    responses(
        (status = 200, description = "Sweep report", body = DataResponse<SweepReport>),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
#[instrument(skip_all)]
pub async fn sweep_orphans(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<DataResponse<SweepReport>>, AppError> {
    let report = run_sweep(state.identities.as_ref(), state.profiles.as_ref()).await?;
    Ok(Json(DataResponse::ok(report)))
}
