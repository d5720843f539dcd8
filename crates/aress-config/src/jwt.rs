use secrecy::SecretString;

use crate::env_lookup;

/// Local access-token verification settings.
///
/// When `secret` is set, bearer tokens are checked against the project's JWT
/// secret before the auth service is consulted. When it is `None`, only the
/// auth service decides.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: Option<SecretString>,
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: None,
            audience: "authenticated".to_string(),
        }
    }
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self::from_vars(env_lookup)
    }

    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            secret: lookup("SUPABASE_JWT_SECRET")
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::from),
            audience: lookup("JWT_AUDIENCE")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "authenticated".to_string()),
        }
    }

    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(SecretString::from(secret.into())),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_secret() {
        let config = JwtConfig::from_vars(|_| None);
        assert!(config.secret.is_none());
        assert_eq!(config.audience, "authenticated");
    }

    #[test]
    fn test_blank_secret_is_ignored() {
        let config = JwtConfig::from_vars(|key| match key {
            "SUPABASE_JWT_SECRET" => Some("  ".to_string()),
            _ => None,
        });
        assert!(config.secret.is_none());
    }
}
