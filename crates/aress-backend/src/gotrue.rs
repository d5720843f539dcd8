//! HTTP client for the hosted auth service (GoTrue API).
//!
//! Two credentials are in play:
//!
//! - the caller's access token, used only to resolve who is calling
//!   (`GET /auth/v1/user`)
//! - the service-role key, used for the privileged admin endpoints
//!   (`/auth/v1/admin/users/{id}`)

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use aress_config::BackendConfig;
use aress_models::{Identity, UserId};

use crate::error::BackendError;
use crate::store::IdentityStore;

/// Client for the auth service's user and admin endpoints.
#[derive(Clone)]
pub struct GoTrueClient {
    client: Client,
    base_url: String,
    service_key: SecretString,
}

impl std::fmt::Debug for GoTrueClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoTrueClient")
            .field("base_url", &self.base_url)
            .field("service_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// The service is inconsistent about where it puts the error text.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}

impl GoTrueClient {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BackendError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.url.clone(),
            service_key: config.service_role_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1{path}", self.base_url)
    }

    fn admin(&self, request: RequestBuilder) -> RequestBuilder {
        let key = self.service_key.expose_secret();
        request.header("apikey", key).bearer_auth(key)
    }

    async fn send(request: RequestBuilder) -> Result<Response, BackendError> {
        request
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))
    }

    async fn api_error(response: Response) -> BackendError {
        let status = response.status();
        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        let message = body.into_message().unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Auth service error")
                .to_string()
        });

        warn!(status = status.as_u16(), %message, "Auth service rejected request");

        BackendError::Api {
            status: status.as_u16(),
            message,
        }
    }

    async fn identity(response: Response) -> Result<Identity, BackendError> {
        response
            .json::<Identity>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[async_trait]
impl IdentityStore for GoTrueClient {
    #[instrument(skip_all)]
    async fn verify_credential(&self, token: &str) -> Result<Identity, BackendError> {
        let request = self
            .client
            .get(self.url("/user"))
            .header("apikey", self.service_key.expose_secret())
            .bearer_auth(token);

        let response = Self::send(request).await?;

        match response.status() {
            status if status.is_success() => {
                let identity = Self::identity(response).await?;
                debug!(user_id = %identity.id, "Credential verified");
                Ok(identity)
            }
            // Expired sessions come back as 401/403, tokens for deleted users
            // as 400 or 404. All of them mean the caller is not signed in.
            status if status.is_client_error() => {
                debug!(status = status.as_u16(), "Credential rejected by auth service");
                Err(BackendError::InvalidCredential)
            }
            _ => Err(Self::api_error(response).await),
        }
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn get_identity(&self, id: UserId) -> Result<Option<Identity>, BackendError> {
        let request = self.admin(self.client.get(self.url(&format!("/admin/users/{id}"))));
        let response = Self::send(request).await?;

        match response.status() {
            status if status.is_success() => Self::identity(response).await.map(Some),
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(Self::api_error(response).await),
        }
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn delete_identity(&self, id: UserId) -> Result<(), BackendError> {
        let request = self.admin(self.client.delete(self.url(&format!("/admin/users/{id}"))));
        let response = Self::send(request).await?;

        match response.status() {
            status if status.is_success() => {
                debug!("Identity deleted");
                Ok(())
            }
            StatusCode::NOT_FOUND => Err(BackendError::NotFound("User not found".to_string())),
            _ => Err(Self::api_error(response).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config() -> BackendConfig {
        BackendConfig {
            url: "https://project.supabase.co".to_string(),
            service_role_key: SecretString::from("service-role-secret"),
            request_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_debug_redacts_service_key() {
        let client = GoTrueClient::new(&config()).unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("service-role-secret"));
    }

    #[test]
    fn test_url_building() {
        let client = GoTrueClient::new(&config()).unwrap();
        assert_eq!(
            client.url("/user"),
            "https://project.supabase.co/auth/v1/user"
        );
    }

    #[test]
    fn test_error_body_message_precedence() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error": "invalid_grant", "error_description": "expired"}"#)
                .unwrap();
        assert_eq!(body.into_message().as_deref(), Some("expired"));

        let body: ErrorBody = serde_json::from_str(r#"{"msg": "User not allowed"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("User not allowed"));

        let body: ErrorBody = serde_json::from_str(r#"{"message": "  "}"#).unwrap();
        assert_eq!(body.into_message(), None);
    }
}
