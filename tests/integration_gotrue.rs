//! The GoTrue client against a local stand-in for the auth service.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use aress_backend::{BackendError, GoTrueClient, IdentityStore};
use aress_config::BackendConfig;
use aress_core::{AppError, ErrorKind};
use aress_models::UserId;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::json;

const SERVICE_KEY: &str = "service-role-key";
const USER_TOKEN: &str = "user-access-token";

#[derive(Clone)]
struct MockAuth {
    known: UserId,
    broken: UserId,
    deleted: Arc<Mutex<Vec<String>>>,
}

fn has_service_key(headers: &HeaderMap) -> bool {
    let bearer = format!("Bearer {SERVICE_KEY}");
    headers.get("apikey").is_some_and(|v| v == SERVICE_KEY)
        && headers.get("authorization").is_some_and(|v| v == bearer.as_str())
}

fn user_json(id: UserId) -> serde_json::Value {
    json!({
        "id": id,
        "email": "jane@aress.com",
        "user_metadata": { "name": "Jane Doe", "role": "manager" },
        "created_at": "2024-05-01T10:00:00Z",
        "aud": "authenticated"
    })
}

async fn current_user(State(mock): State<MockAuth>, headers: HeaderMap) -> Response {
    let apikey_ok = headers.get("apikey").is_some_and(|v| v == SERVICE_KEY);
    let bearer_ok = headers
        .get("authorization")
        .is_some_and(|v| v == format!("Bearer {USER_TOKEN}").as_str());

    if apikey_ok && bearer_ok {
        return Json(user_json(mock.known)).into_response();
    }

    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let (status, msg) = match bearer {
        "Bearer stale-token" => (
            StatusCode::BAD_REQUEST,
            "User from sub claim in JWT does not exist",
        ),
        "Bearer gone-token" => (StatusCode::NOT_FOUND, "User not found"),
        "Bearer outage-token" => (StatusCode::SERVICE_UNAVAILABLE, "upstream unavailable"),
        _ => (StatusCode::UNAUTHORIZED, "invalid JWT"),
    };
    (status, Json(json!({ "msg": msg }))).into_response()
}

async fn get_user(
    State(mock): State<MockAuth>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !has_service_key(&headers) {
        return (StatusCode::FORBIDDEN, Json(json!({ "msg": "not admin" }))).into_response();
    }
    if id == mock.known.to_string() {
        Json(user_json(mock.known)).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({ "msg": "User not found" }))).into_response()
    }
}

async fn delete_user(
    State(mock): State<MockAuth>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !has_service_key(&headers) {
        return (StatusCode::FORBIDDEN, Json(json!({ "msg": "not admin" }))).into_response();
    }
    if id == mock.broken.to_string() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Database error deleting user" })),
        )
            .into_response();
    }

    let mut deleted = mock.deleted.lock().unwrap();
    if id == mock.known.to_string() && !deleted.contains(&id) {
        deleted.push(id);
        Json(json!({})).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({ "msg": "User not found" }))).into_response()
    }
}

async fn spawn_mock() -> (GoTrueClient, MockAuth) {
    let mock = MockAuth {
        known: UserId::new(),
        broken: UserId::new(),
        deleted: Arc::new(Mutex::new(Vec::new())),
    };

    let app = Router::new()
        .route("/auth/v1/user", get(current_user))
        .route("/auth/v1/admin/users/{id}", get(get_user).delete(delete_user))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = GoTrueClient::new(&BackendConfig {
        url: format!("http://{addr}"),
        service_role_key: SecretString::from(SERVICE_KEY),
        request_timeout: Duration::from_secs(5),
    })
    .unwrap();

    (client, mock)
}

#[tokio::test]
async fn test_verify_credential_decodes_identity() {
    let (client, mock) = spawn_mock().await;

    let identity = client.verify_credential(USER_TOKEN).await.unwrap();

    assert_eq!(identity.id, mock.known);
    assert_eq!(identity.email.as_deref(), Some("jane@aress.com"));
    assert_eq!(identity.metadata.name.as_deref(), Some("Jane Doe"));
    assert_eq!(identity.metadata.role.as_deref(), Some("manager"));
    assert!(identity.created_at.is_some());
}

#[tokio::test]
async fn test_rejected_credential_is_invalid() {
    let (client, _) = spawn_mock().await;

    let err = client.verify_credential("forged").await.unwrap_err();

    assert!(matches!(err, BackendError::InvalidCredential));
}

#[tokio::test]
async fn test_any_client_error_from_user_endpoint_is_invalid_credential() {
    let (client, _) = spawn_mock().await;

    for token in ["stale-token", "gone-token"] {
        let err = client.verify_credential(token).await.unwrap_err();
        assert!(matches!(err, BackendError::InvalidCredential), "{token}: {err:?}");

        let err = AppError::from(err);
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(err.public_message(), "Invalid token");
    }
}

#[tokio::test]
async fn test_auth_service_outage_is_not_a_credential_error() {
    let (client, _) = spawn_mock().await;

    let err = client.verify_credential("outage-token").await.unwrap_err();

    assert!(matches!(err, BackendError::Api { status: 503, .. }));
}

#[tokio::test]
async fn test_get_identity() {
    let (client, mock) = spawn_mock().await;

    let found = client.get_identity(mock.known).await.unwrap();
    assert_eq!(found.map(|i| i.id), Some(mock.known));

    let missing = client.get_identity(UserId::new()).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_delete_identity_is_not_repeatable() {
    let (client, mock) = spawn_mock().await;

    client.delete_identity(mock.known).await.unwrap();

    let err = client.delete_identity(mock.known).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(mock.deleted.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_upstream_message_is_passed_through() {
    let (client, mock) = spawn_mock().await;

    let err = client.delete_identity(mock.broken).await.unwrap_err();

    match err {
        BackendError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Database error deleting user");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_service_is_request_error() {
    let client = GoTrueClient::new(&BackendConfig {
        url: "http://127.0.0.1:1".to_string(),
        service_role_key: SecretString::from(SERVICE_KEY),
        request_timeout: Duration::from_secs(2),
    })
    .unwrap();

    let err = client.verify_credential(USER_TOKEN).await.unwrap_err();

    assert!(matches!(err, BackendError::Request(_)));
}
