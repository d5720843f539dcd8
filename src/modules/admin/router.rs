use axum::{Router, routing::post};

use crate::modules::admin::controller::{delete_user, sweep_orphans};
use crate::router::method_not_allowed;
use crate::state::AppState;

pub fn init_admin_router() -> Router<AppState> {
    Router::new()
        .route("/delete-user", post(delete_user))
        .route("/sweep-orphans", post(sweep_orphans))
        .method_not_allowed_fallback(method_not_allowed)
}
