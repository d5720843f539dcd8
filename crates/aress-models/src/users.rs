//! Identity and profile models plus the user-administration DTOs.
//!
//! # Core Types
//!
//! - [`Identity`] - an account in the hosted auth service
//! - [`Profile`] - the application-level mirror of an identity, carrying the role
//!
//! # Request DTOs
//!
//! - [`DeleteUserRequest`] - body of the admin delete endpoint
//! - [`UpdateUserDto`] - admin edit of a profile's name and role

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::UserId;
use crate::roles::{Permissions, Role};

/// Free-form metadata the auth service stores next to an identity.
/// Only the keys the CRM understands are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// An account in the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "user_metadata")]
    pub metadata: IdentityMetadata,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identity {
    /// Metadata name, then email, then the id.
    pub fn display_name(&self) -> String {
        self.metadata
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .or(self.email.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| self.id.to_string())
    }
}

/// A row of `user_profiles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Values for inserting a profile, or refreshing an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Only applied when the row is created. An existing row keeps its role.
    pub role: Role,
}

impl NewProfile {
    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            name: identity.display_name(),
            email: identity.email.clone().unwrap_or_default(),
            role: Role::for_self_registration(identity.metadata.role.as_deref()),
        }
    }
}

/// Partial update of a profile; `None` leaves the column as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub role: Option<Role>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.role.is_none()
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DeleteUserRequest {
    #[serde(rename = "userId", default)]
    #[validate(
        required(message = "userId is required"),
        length(min = 1, message = "userId is required")
    )]
    #[schema(value_type = String, format = Uuid)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 1, max = 120, message = "name must be between 1 and 120 characters"))]
    pub name: Option<String>,
    pub role: Option<Role>,
}

impl From<UpdateUserDto> for ProfileUpdate {
    fn from(dto: UpdateUserDto) -> Self {
        Self {
            name: dto.name.map(|n| n.trim().to_string()),
            role: dto.role,
        }
    }
}

/// The caller's own profile and the feature flags its role grants.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentUser {
    pub profile: Profile,
    pub permissions: Permissions,
}

impl From<Profile> for CurrentUser {
    fn from(profile: Profile) -> Self {
        let permissions = Permissions::from(profile.role);
        Self {
            profile,
            permissions,
        }
    }
}

/// Result of scanning for profiles whose identity no longer exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub scanned: usize,
    pub removed: Vec<UserId>,
    /// Profiles that could not be checked or removed this round.
    pub failed: Vec<UserId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(name: Option<&str>, email: Option<&str>, role: Option<&str>) -> Identity {
        Identity {
            id: UserId::new(),
            email: email.map(str::to_string),
            metadata: IdentityMetadata {
                name: name.map(str::to_string),
                role: role.map(str::to_string),
            },
            created_at: None,
        }
    }

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(
            identity(Some("Sarah Connor"), Some("sarah@aress.com"), None).display_name(),
            "Sarah Connor"
        );
        assert_eq!(
            identity(Some("  "), Some("sarah@aress.com"), None).display_name(),
            "sarah@aress.com"
        );
        let anonymous = identity(None, None, None);
        assert_eq!(anonymous.display_name(), anonymous.id.to_string());
    }

    #[test]
    fn test_new_profile_from_identity_caps_role() {
        let profile = NewProfile::from_identity(&identity(
            Some("Mallory"),
            Some("mallory@aress.com"),
            Some("admin"),
        ));
        assert_eq!(profile.role, Role::SalesRep);
        assert_eq!(profile.email, "mallory@aress.com");
    }

    #[test]
    fn test_identity_deserializes_gotrue_shape() {
        let json = r#"{
            "id": "2f1a3c1e-5d6b-4f0e-8a9b-1c2d3e4f5a6b",
            "aud": "authenticated",
            "email": "john@aress.com",
            "user_metadata": {"name": "John Manager", "role": "manager", "avatar": 3},
            "app_metadata": {"provider": "email"},
            "created_at": "2025-02-01T00:00:00Z"
        }"#;
        let identity: Identity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.metadata.role.as_deref(), Some("manager"));
        assert_eq!(identity.display_name(), "John Manager");
        assert!(identity.created_at.is_some());
    }

    #[test]
    fn test_identity_without_id_fails() {
        let json = r#"{"email": "x@aress.com"}"#;
        assert!(serde_json::from_str::<Identity>(json).is_err());
    }

    #[test]
    fn test_delete_request_validation() {
        let missing: DeleteUserRequest = serde_json::from_str("{}").unwrap();
        let errors = missing.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("user_id"));

        let empty: DeleteUserRequest = serde_json::from_str(r#"{"userId": ""}"#).unwrap();
        assert!(empty.validate().is_err());

        let ok: DeleteUserRequest =
            serde_json::from_str(r#"{"userId": "2f1a3c1e-5d6b-4f0e-8a9b-1c2d3e4f5a6b"}"#).unwrap();
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_update_dto_into_profile_update() {
        let dto: UpdateUserDto =
            serde_json::from_str(r#"{"name": "  Jane  ", "role": "manager"}"#).unwrap();
        assert!(dto.validate().is_ok());

        let update = ProfileUpdate::from(dto);
        assert_eq!(update.name.as_deref(), Some("Jane"));
        assert_eq!(update.role, Some(Role::Manager));
        assert!(!update.is_empty());
        assert!(ProfileUpdate::default().is_empty());
    }

    #[test]
    fn test_update_dto_rejects_empty_name() {
        let dto = UpdateUserDto {
            name: Some(String::new()),
            role: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_profile_serializes_camel_case() {
        let profile = Profile {
            id: UserId::new(),
            name: "Admin User".to_string(),
            email: "admin@aress.com".to_string(),
            role: Role::Admin,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["role"], "admin");

        let current = CurrentUser::from(profile);
        assert!(current.permissions.can_manage_users);
    }
}
