use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::modules::users::controller::{get_me, list_users, sync_me, update_user};
use crate::router::method_not_allowed;
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/me", get(get_me))
        .route("/me/sync", post(sync_me))
        .route("/{id}", patch(update_user))
        .method_not_allowed_fallback(method_not_allowed)
}
