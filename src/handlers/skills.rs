use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{self, CacheConfig, RedisCache};
use crate::db::skills as skill_db;
use crate::error::ApiError;
use crate::models::skills::{self, CreateSkill, SkillSearchQuery};

/// POST /api/skills — add a skill to the catalogue. Names are unique; the
/// pre-check gives the friendly message, the unique index gives correctness.
pub async fn create_skill(
    _caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    body: web::Json<CreateSkill>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();

    if skill_db::get_skill_by_name(db.get_ref(), &input.name)
        .await?
        .is_some()
    {
        return Err(ApiError::invalid("Skill already exists"));
    }

    let skill = skill_db::insert_skill(db.get_ref(), input)
        .await
        .map_err(|e| ApiError::from_insert(e, "Skill already exists"))?;

    let _ = cache.delete(&cache::keys::skills()).await;

    Ok(HttpResponse::Created().json(skill))
}

/// GET /api/skills — the whole catalogue, alphabetical. Cached.
pub async fn get_skills(
    _caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
) -> Result<HttpResponse, ApiError> {
    let cache_key = cache::keys::skills();
    if let Ok(Some(cached)) = cache.get::<Vec<skills::Model>>(&cache_key).await {
        return Ok(HttpResponse::Ok().json(cached));
    }

    let all = skill_db::get_all_skills(db.get_ref()).await?;

    let ttl = CacheConfig::from_env().skills_ttl.as_secs();
    let _ = cache.set(&cache_key, &all, Some(ttl)).await;

    Ok(HttpResponse::Ok().json(all))
}

/// GET /api/skills/search?q= — case-insensitive substring search.
pub async fn search_skills(
    _caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<SkillSearchQuery>,
) -> Result<HttpResponse, ApiError> {
    let found = skill_db::search_skills(db.get_ref(), &query.q).await?;
    Ok(HttpResponse::Ok().json(found))
}

/// GET /api/skills/{id} — a single catalogue entry.
pub async fn get_skill(
    _caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let skill = skill_db::get_skill_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::not_found("Skill not found"))?;
    Ok(HttpResponse::Ok().json(skill))
}

/// DELETE /api/skills/{id} — remove a catalogue entry (cascades the
/// user/project rows that reference it).
pub async fn delete_skill(
    _caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let result = skill_db::delete_skill(db.get_ref(), id).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("Skill not found"));
    }

    // The cascade stales every cached shape that embeds this skill: the
    // catalogue, the open-project listing, and an unknown set of profiles
    // and project details.
    let _ = cache.delete(&cache::keys::skills()).await;
    let _ = cache.delete(&cache::keys::open_projects()).await;
    let _ = cache.delete_pattern(&cache::keys::profile_pattern()).await;
    let _ = cache.delete_pattern(&cache::keys::project_pattern()).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Skill deleted",
    })))
}
