use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};

use aress_config::CorsConfig;
use aress_core::AppError;
use aress_observability::{logging_middleware, metrics_middleware, metrics_routes};

use crate::docs::ApiDoc;
use crate::modules::admin::router::init_admin_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if config.allows_any_origin() {
        AllowOrigin::any()
    } else {
        let allowed: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        AllowOrigin::list(allowed)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("apikey"),
            HeaderName::from_static("x-client-info"),
        ])
}

async fn not_found() -> AppError {
    AppError::not_found("Not found")
}

/// 405 in the JSON envelope. Feature routers install it on their own
/// routes so it survives nesting.
pub async fn method_not_allowed() -> AppError {
    AppError::method_not_allowed()
}

pub fn init_router(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/admin", init_admin_router())
                .nest("/users", init_users_router()),
        )
        .fallback(not_found)
        .with_state(state.clone());

    if let Some(handle) = state.metrics.clone() {
        router = router
            .merge(metrics_routes(handle))
            .layer(middleware::from_fn(metrics_middleware));
    }

    router
        .layer(cors_layer(&state.cors_config))
        .layer(middleware::from_fn(logging_middleware))
}
