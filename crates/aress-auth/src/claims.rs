use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by the platform's access tokens.
///
/// Only the fields the API reads are modelled; anything else in the token is
/// ignored during deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Identity id (subject claim)
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Postgres role of the session, `authenticated` for signed-in users.
    /// This is not the CRM role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}
