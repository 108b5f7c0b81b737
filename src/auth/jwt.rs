use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::jwks::JwksCache;

/// Effective role for the current request, derived from token claims.
///
/// Role is never stored on the local user row — Keycloak owns it, and we
/// re-derive it on every request so a role change takes effect with the next
/// token instead of going stale in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Leader,
    Freelancer,
}

/// Keycloak access-token claims.
///
/// The `sub` field is the user's UUID in the Keycloak realm. Realm roles
/// arrive under `realm_access.roles`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The Keycloak user UUID.
    pub sub: String,
    /// Token expiration (Unix timestamp).
    pub exp: usize,
    /// Token issued-at (Unix timestamp).
    pub iat: Option<usize>,
    /// Issuer — the realm URL.
    pub iss: Option<String>,
    pub email: Option<String>,
    pub preferred_username: Option<String>,
    pub name: Option<String>,
    pub realm_access: Option<RealmAccess>,
}

/// Realm-level role container from Keycloak.
#[derive(Debug, Serialize, Deserialize)]
pub struct RealmAccess {
    pub roles: Vec<String>,
}

impl Claims {
    /// Extract the external identity UUID from the `sub` claim.
    pub fn external_id(&self) -> Result<Uuid, String> {
        Uuid::parse_str(&self.sub).map_err(|e| format!("Invalid UUID in sub claim: {e}"))
    }

    pub fn user_email(&self) -> Option<String> {
        self.email.clone()
    }

    /// Username for the local shadow record: `preferred_username`, falling
    /// back to the email local part, then the raw subject id.
    pub fn username(&self) -> String {
        if let Some(u) = &self.preferred_username {
            return u.clone();
        }
        if let Some(email) = &self.email {
            if let Some((local, _)) = email.split_once('@') {
                return local.to_string();
            }
        }
        self.sub.clone()
    }

    /// Derive the effective role: membership of the `leader` realm role wins,
    /// everyone else is a freelancer.
    pub fn role(&self) -> Role {
        let is_leader = self
            .realm_access
            .as_ref()
            .map(|ra| ra.roles.iter().any(|r| r == "leader"))
            .unwrap_or(false);

        if is_leader { Role::Leader } else { Role::Freelancer }
    }
}

/// Validate a Keycloak JWT against the realm JWKS and return the claims.
pub async fn validate_token(token: &str, jwks_cache: &JwksCache) -> Result<Claims, String> {
    jwks_cache.validate_token(token).await.map(|td| td.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(roles: &[&str]) -> Claims {
        Claims {
            sub: "4f9b7c1a-1111-2222-3333-444455556666".to_string(),
            exp: 2_000_000_000,
            iat: None,
            iss: Some("https://id.example.com/realms/teamlink".to_string()),
            email: Some("maya@example.com".to_string()),
            preferred_username: Some("maya".to_string()),
            name: None,
            realm_access: Some(RealmAccess {
                roles: roles.iter().map(|r| r.to_string()).collect(),
            }),
        }
    }

    #[test]
    fn leader_role_is_derived_from_realm_roles() {
        assert_eq!(claims(&["offline_access", "leader"]).role(), Role::Leader);
        assert_eq!(claims(&["freelancer"]).role(), Role::Freelancer);
        assert_eq!(claims(&[]).role(), Role::Freelancer);
    }

    #[test]
    fn missing_realm_access_defaults_to_freelancer() {
        let mut c = claims(&[]);
        c.realm_access = None;
        assert_eq!(c.role(), Role::Freelancer);
    }

    #[test]
    fn username_falls_back_to_email_local_part() {
        let mut c = claims(&[]);
        assert_eq!(c.username(), "maya");

        c.preferred_username = None;
        assert_eq!(c.username(), "maya");

        c.email = None;
        assert_eq!(c.username(), c.sub);
    }

    #[test]
    fn external_id_parses_the_sub_uuid() {
        let c = claims(&[]);
        assert_eq!(
            c.external_id().unwrap(),
            Uuid::parse_str("4f9b7c1a-1111-2222-3333-444455556666").unwrap()
        );
    }

    #[test]
    fn keycloak_shaped_json_deserializes() {
        let json = serde_json::json!({
            "sub": "4f9b7c1a-1111-2222-3333-444455556666",
            "exp": 2_000_000_000u64,
            "iat": 1_900_000_000u64,
            "iss": "https://id.example.com/realms/teamlink",
            "email": "maya@example.com",
            "preferred_username": "maya",
            "realm_access": { "roles": ["leader", "uma_authorization"] },
            "azp": "teamlink-web"
        });

        let c: Claims = serde_json::from_value(json).unwrap();
        assert_eq!(c.role(), Role::Leader);
        assert_eq!(c.username(), "maya");
    }
}
