use actix_web::FromRequest;
use actix_web::{Error, HttpRequest, dev::Payload, web};
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::auth::jwks::JwksCache;
use crate::auth::jwt::{self, Role};
use crate::db::users::find_or_create_from_claims;
use crate::error::ApiError;
use crate::models::users;

/// The resolved caller: local user shadow row plus the per-request role
/// derived from the token claims.
pub struct AuthenticatedUser {
    pub user: users::Model,
    pub role: Role,
}

impl AuthenticatedUser {
    /// Operations reserved for project leaders.
    pub fn require_leader(&self) -> Result<(), ApiError> {
        if self.role == Role::Leader {
            Ok(())
        } else {
            Err(ApiError::forbidden("Only leaders can perform this action"))
        }
    }

    /// Operations reserved for freelancers.
    pub fn require_freelancer(&self) -> Result<(), ApiError> {
        if self.role == Role::Freelancer {
            Ok(())
        } else {
            Err(ApiError::forbidden(
                "Only freelancers can perform this action",
            ))
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // 1. Extract the Bearer token from the Authorization header.
            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| {
                    Error::from(ApiError::Unauthenticated(
                        "Missing Authorization header".into(),
                    ))
                })?;

            let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
                Error::from(ApiError::Unauthenticated(
                    "Authorization header must be: Bearer <token>".into(),
                ))
            })?;

            // 2. Validate the JWT against the realm JWKS.
            let jwks_cache = req.app_data::<web::Data<Arc<JwksCache>>>().ok_or_else(|| {
                actix_web::error::ErrorInternalServerError("JWKS cache not configured")
            })?;

            let claims = jwt::validate_token(token, jwks_cache.get_ref())
                .await
                .map_err(|e| {
                    Error::from(ApiError::Unauthenticated(format!("Invalid token: {e}")))
                })?;

            let external_id = claims
                .external_id()
                .map_err(|e| Error::from(ApiError::Unauthenticated(e)))?;

            let email = claims.user_email().ok_or_else(|| {
                Error::from(ApiError::Unauthenticated("No email in token claims".into()))
            })?;

            // 3. Get-or-create the local shadow row keyed on the external id,
            //    so foreign keys have something to point at before the user
            //    has touched any other endpoint.
            let db = req
                .app_data::<web::Data<DatabaseConnection>>()
                .ok_or_else(|| {
                    actix_web::error::ErrorInternalServerError("Database not configured")
                })?;

            let user = find_or_create_from_claims(db.get_ref(), external_id, &claims, email)
                .await
                .map_err(|e| Error::from(ApiError::Database(e)))?;

            Ok(AuthenticatedUser {
                user,
                role: claims.role(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            user: users::Model {
                id: Uuid::new_v4(),
                keycloak_id: Uuid::new_v4(),
                username: "test".into(),
                email: "test@example.com".into(),
                bio: None,
                avatar_url: None,
                is_active: true,
                last_login_at: None,
                created_at: Utc::now(),
            },
            role,
        }
    }

    #[test]
    fn role_gates_reject_the_other_role() {
        assert!(user(Role::Leader).require_leader().is_ok());
        assert!(user(Role::Leader).require_freelancer().is_err());
        assert!(user(Role::Freelancer).require_freelancer().is_ok());
        assert!(user(Role::Freelancer).require_leader().is_err());
    }
}
