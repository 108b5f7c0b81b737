use actix_web::{HttpResponse, Responder};

use crate::auth::middleware::AuthenticatedUser;

/// GET /api/auth/me — the resolved local user plus the effective role
/// derived from the token (the get-or-create already ran in the extractor).
pub async fn me(caller: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "id": caller.user.id,
        "username": caller.user.username,
        "email": caller.user.email,
        "bio": caller.user.bio,
        "avatar_url": caller.user.avatar_url,
        "created_at": caller.user.created_at,
        "role": caller.role,
    }))
}
