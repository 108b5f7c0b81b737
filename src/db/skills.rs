use sea_orm::sea_query::{Expr, Func};
use sea_orm::*;
use uuid::Uuid;

use crate::models::skills::{self, CreateSkill};

/// Insert a new skill into the catalogue. The unique index on `name` rejects
/// duplicates that race past the handler's pre-check.
pub async fn insert_skill(
    db: &DatabaseConnection,
    input: CreateSkill,
) -> Result<skills::Model, DbErr> {
    let new_skill = skills::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
    };

    new_skill.insert(db).await
}

/// Fetch the whole catalogue, alphabetically.
pub async fn get_all_skills(db: &DatabaseConnection) -> Result<Vec<skills::Model>, DbErr> {
    skills::Entity::find()
        .order_by_asc(skills::Column::Name)
        .all(db)
        .await
}

/// Fetch a single skill by ID.
pub async fn get_skill_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<skills::Model>, DbErr> {
    skills::Entity::find_by_id(id).one(db).await
}

/// Fetch a skill by exact name.
pub async fn get_skill_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<skills::Model>, DbErr> {
    skills::Entity::find()
        .filter(skills::Column::Name.eq(name))
        .one(db)
        .await
}

/// Case-insensitive substring search over skill names.
pub async fn search_skills(
    db: &DatabaseConnection,
    query: &str,
) -> Result<Vec<skills::Model>, DbErr> {
    let pattern = format!("%{}%", query.to_lowercase());
    skills::Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(skills::Column::Name))).like(pattern))
        .order_by_asc(skills::Column::Name)
        .all(db)
        .await
}

/// Delete a skill by ID (cascades its user/project skill rows).
pub async fn delete_skill(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    skills::Entity::delete_by_id(id).exec(db).await
}
