//! CRM roles and what each one may do.
//!
//! | Role | Manage users | Delete leads | View reports |
//! |------|--------------|--------------|--------------|
//! | `admin` | yes | yes | yes |
//! | `manager` | no | yes | yes |
//! | `sales_rep` | no | no | no |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    #[default]
    SalesRep,
}

/// A role string that is not one of `admin`, `manager`, `sales_rep`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Manager, Role::SalesRep];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::SalesRep => "sales_rep",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Manager => "Manager",
            Role::SalesRep => "Sales Representative",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn can_manage_users(&self) -> bool {
        self.is_admin()
    }

    pub fn can_delete_leads(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }

    pub fn can_view_reports(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }

    /// Role a new profile gets from a self-declared request.
    ///
    /// Admin can only be granted by an existing admin or the CLI, so a request
    /// for it (or for nothing, or for garbage) falls back to `sales_rep`.
    pub fn for_self_registration(requested: Option<&str>) -> Role {
        match requested.and_then(|r| r.parse::<Role>().ok()) {
            Some(Role::Manager) => Role::Manager,
            _ => Role::SalesRep,
        }
    }
}

/// Feature flags derived from a role, as shown to the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    pub role_label: String,
    pub can_manage_users: bool,
    pub can_delete_leads: bool,
    pub can_view_reports: bool,
}

impl From<Role> for Permissions {
    fn from(role: Role) -> Self {
        Self {
            role_label: role.label().to_string(),
            can_manage_users: role.can_manage_users(),
            can_delete_leads: role.can_delete_leads(),
            can_view_reports: role.can_view_reports(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "sales_rep" => Ok(Role::SalesRep),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_strings() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
            assert_eq!(
                serde_json::to_string(&role).unwrap(),
                format!("\"{}\"", role.as_str())
            );
        }
    }

    #[test]
    fn test_unknown_role() {
        let err = "superuser".parse::<Role>().unwrap_err();
        assert_eq!(err, UnknownRole("superuser".to_string()));
        assert!(serde_json::from_str::<Role>("\"Admin\"").is_err());
    }

    #[test]
    fn test_permissions() {
        assert!(Role::Admin.can_manage_users());
        assert!(!Role::Manager.can_manage_users());
        assert!(!Role::SalesRep.can_manage_users());

        assert!(Role::Manager.can_delete_leads());
        assert!(!Role::SalesRep.can_delete_leads());
        assert!(Role::Manager.can_view_reports());
    }

    #[test]
    fn test_permissions_serialize_camel_case() {
        let json = serde_json::to_value(Permissions::from(Role::Manager)).unwrap();
        assert_eq!(json["roleLabel"], "Manager");
        assert_eq!(json["canManageUsers"], false);
        assert_eq!(json["canDeleteLeads"], true);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Role::Admin.label(), "Administrator");
        assert_eq!(Role::SalesRep.label(), "Sales Representative");
    }

    #[test]
    fn test_self_registration_never_grants_admin() {
        assert_eq!(Role::for_self_registration(Some("admin")), Role::SalesRep);
        assert_eq!(Role::for_self_registration(Some("manager")), Role::Manager);
        assert_eq!(Role::for_self_registration(Some("sales_rep")), Role::SalesRep);
        assert_eq!(Role::for_self_registration(Some("root")), Role::SalesRep);
        assert_eq!(Role::for_self_registration(None), Role::SalesRep);
    }
}
