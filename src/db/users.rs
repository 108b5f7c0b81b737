use sea_orm::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::jwt::Claims;
use crate::models::users::{self, UpdateProfile, UserSummary};

/// Get-or-create the local shadow row for an externally-owned identity,
/// keyed on the Keycloak subject id (called by the auth extractor on every
/// request). Existing users get their last-login timestamp refreshed.
pub async fn find_or_create_from_claims(
    db: &DatabaseConnection,
    keycloak_id: Uuid,
    claims: &Claims,
    email: String,
) -> Result<users::Model, DbErr> {
    if let Some(existing) = users::Entity::find()
        .filter(users::Column::KeycloakId.eq(keycloak_id))
        .one(db)
        .await?
    {
        let mut active: users::ActiveModel = existing.into();
        active.last_login_at = Set(Some(chrono::Utc::now()));
        return active.update(db).await;
    }

    let new_user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        keycloak_id: Set(keycloak_id),
        username: Set(claims.username()),
        email: Set(email),
        bio: Set(None),
        avatar_url: Set(None),
        is_active: Set(true),
        last_login_at: Set(Some(chrono::Utc::now())),
        created_at: Set(chrono::Utc::now()),
    };

    new_user.insert(db).await
}

/// Fetch a single user by ID.
pub async fn get_user_by_id(
    db: &impl ConnectionTrait,
    id: Uuid,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(db).await
}

/// Fetch all active users.
pub async fn get_active_users(db: &DatabaseConnection) -> Result<Vec<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::IsActive.eq(true))
        .all(db)
        .await
}

/// Batch-load user summaries for response composition.
pub async fn get_summaries(
    db: &impl ConnectionTrait,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, UserSummary>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = users::Entity::find()
        .filter(users::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|u| (u.id, UserSummary::from(u)))
        .collect())
}

/// Update the caller's own profile fields.
pub async fn update_profile(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateProfile,
) -> Result<users::Model, DbErr> {
    let user = users::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

    let mut active: users::ActiveModel = user.into();

    if let Some(username) = input.username {
        active.username = Set(username);
    }
    if let Some(bio) = input.bio {
        active.bio = Set(Some(bio));
    }
    if let Some(avatar_url) = input.avatar_url {
        active.avatar_url = Set(Some(avatar_url));
    }

    active.update(db).await
}
