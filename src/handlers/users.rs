use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{self, CacheConfig, RedisCache};
use crate::db::ratings as rating_db;
use crate::db::user_skills as user_skill_db;
use crate::db::users as user_db;
use crate::db::skills as skill_db;
use crate::error::ApiError;
use crate::models::user_skills::{AddSkill, SkillWithLevel};
use crate::models::users::{UpdateProfile, UserProfile, round_average};
use std::sync::Arc;

/// List shape for GET /api/users: summary plus held skills.
#[derive(Debug, Serialize)]
pub struct UserWithSkills {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub skills: Vec<SkillWithLevel>,
}

/// GET /api/users — all active users with their skills.
pub async fn get_users(
    _caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let users = user_db::get_active_users(db.get_ref()).await?;

    let mut out = Vec::with_capacity(users.len());
    for user in users {
        let skills = user_skill_db::get_skills_with_names(db.get_ref(), user.id).await?;
        out.push(UserWithSkills {
            id: user.id,
            username: user.username,
            email: user.email,
            bio: user.bio,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
            skills,
        });
    }

    Ok(HttpResponse::Ok().json(out))
}

/// GET /api/users/{id}/profile — public profile with skills, received
/// ratings, and the rating aggregate. Cached.
pub async fn get_user_profile(
    _caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();

    let cache_key = cache::keys::profile(&user_id.to_string());
    if let Ok(Some(cached)) = cache.get::<UserProfile>(&cache_key).await {
        return Ok(HttpResponse::Ok().json(cached));
    }

    let user = user_db::get_user_by_id(db.get_ref(), user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let skills = user_skill_db::get_skills_with_names(db.get_ref(), user_id).await?;
    let ratings = rating_db::get_received_ratings(db.get_ref(), user_id).await?;

    let total_ratings = ratings.len();
    let sum: i64 = ratings.iter().map(|r| r.score as i64).sum();

    let profile = UserProfile {
        id: user.id,
        username: user.username,
        email: user.email,
        bio: user.bio,
        avatar_url: user.avatar_url,
        created_at: user.created_at,
        skills,
        ratings,
        average_rating: round_average(sum, total_ratings),
        total_ratings,
    };

    let ttl = CacheConfig::from_env().profile_ttl.as_secs();
    let _ = cache.set(&cache_key, &profile, Some(ttl)).await;

    Ok(HttpResponse::Ok().json(profile))
}

/// PUT /api/users/me/profile — update the caller's own profile fields.
pub async fn update_my_profile(
    caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    body: web::Json<UpdateProfile>,
) -> Result<HttpResponse, ApiError> {
    let updated = user_db::update_profile(db.get_ref(), caller.user.id, body.into_inner()).await?;

    let _ = cache
        .delete(&cache::keys::profile(&caller.user.id.to_string()))
        .await;

    Ok(HttpResponse::Ok().json(updated))
}

/// GET /api/users/me/skills — the caller's held skills.
pub async fn get_my_skills(
    caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let skills = user_skill_db::get_skills_with_names(db.get_ref(), caller.user.id).await?;
    Ok(HttpResponse::Ok().json(skills))
}

/// GET /api/users/{id}/skills — another user's held skills.
pub async fn get_user_skills(
    _caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    let skills = user_skill_db::get_skills_with_names(db.get_ref(), user_id).await?;
    Ok(HttpResponse::Ok().json(skills))
}

/// POST /api/users/me/skills — add a skill to the caller's set, or update
/// its level when the pair already exists.
pub async fn add_skill(
    caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    body: web::Json<AddSkill>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();

    skill_db::get_skill_by_id(db.get_ref(), input.skill_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Skill not found"))?;

    let row = user_skill_db::upsert_user_skill(db.get_ref(), caller.user.id, input).await?;

    let _ = cache
        .delete(&cache::keys::profile(&caller.user.id.to_string()))
        .await;

    Ok(HttpResponse::Created().json(row))
}

/// DELETE /api/users/me/skills/{skill_id} — remove a held skill.
pub async fn remove_skill(
    caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let skill_id = path.into_inner();

    let result =
        user_skill_db::delete_user_skill(db.get_ref(), caller.user.id, skill_id).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("User skill not found"));
    }

    let _ = cache
        .delete(&cache::keys::profile(&caller.user.id.to_string()))
        .await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Skill removed",
    })))
}
