#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use aress::modules::admin::cleanup::CleanupQueue;
use aress::router::init_router;
use aress::state::AppState;
use aress_backend::memory::{InMemoryIdentityStore, InMemoryProfileStore};
use aress_config::{CleanupConfig, JwtConfig};
use aress_models::{Profile, Role, UserId};
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub struct TestUser {
    pub id: UserId,
    pub email: String,
    pub token: String,
}

/// The router over in-memory stores, with handles on both stores.
pub struct TestApp {
    pub identities: Arc<InMemoryIdentityStore>,
    pub profiles: Arc<InMemoryProfileStore>,
    pub state: AppState,
}

pub fn fast_cleanup() -> CleanupConfig {
    CleanupConfig {
        max_attempts: 5,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(10),
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_jwt(JwtConfig::default())
    }

    pub fn with_jwt(jwt_config: JwtConfig) -> Self {
        let identities = Arc::new(InMemoryIdentityStore::new());
        let profiles = Arc::new(InMemoryProfileStore::new());

        let mut state = AppState::new(identities.clone(), profiles.clone());
        state.jwt_config = jwt_config;
        state.cleanup = CleanupQueue::spawn(profiles.clone(), fast_cleanup());

        Self {
            identities,
            profiles,
            state,
        }
    }

    /// An identity with a profile of the given role. The token doubles as the
    /// bearer credential.
    pub fn user(&self, name: &str, role: Role) -> TestUser {
        let email = format!("{}-{}@aress.com", name, UserId::new());
        let token = format!("token-{}", UserId::new());
        let identity = self.identities.add_user(&email, name, &token);
        self.profiles.add_for(&identity, role);
        TestUser {
            id: identity.id,
            email,
            token,
        }
    }

    /// An identity without a profile.
    pub fn identity_only(&self, name: &str) -> TestUser {
        let email = format!("{}-{}@aress.com", name, UserId::new());
        let token = format!("token-{}", UserId::new());
        let identity = self.identities.add_user(&email, name, &token);
        TestUser {
            id: identity.id,
            email,
            token,
        }
    }

    pub fn profile(&self, id: UserId) -> Option<Profile> {
        self.profiles.get(id)
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        init_router(self.state.clone())
            .oneshot(request)
            .await
            .unwrap()
    }

    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.send(request).await;
        let status = response.status();
        (status, body_json(response).await)
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}
