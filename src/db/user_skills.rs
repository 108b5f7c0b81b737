use sea_orm::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::user_skills::{self, AddSkill, SkillLevel, SkillWithLevel};

/// Add a skill to a user, or re-level it if the pair already exists
/// (upsert-by-pair, matching the "add skill" endpoint's semantics).
pub async fn upsert_user_skill(
    db: &DatabaseConnection,
    user_id: Uuid,
    input: AddSkill,
) -> Result<user_skills::Model, DbErr> {
    if let Some(existing) = user_skills::Entity::find_by_id((user_id, input.skill_id))
        .one(db)
        .await?
    {
        let mut active: user_skills::ActiveModel = existing.into();
        active.level = Set(input.level);
        return active.update(db).await;
    }

    let new_row = user_skills::ActiveModel {
        user_id: Set(user_id),
        skill_id: Set(input.skill_id),
        level: Set(input.level),
    };

    new_row.insert(db).await
}

/// Remove a held skill.
pub async fn delete_user_skill(
    db: &DatabaseConnection,
    user_id: Uuid,
    skill_id: Uuid,
) -> Result<DeleteResult, DbErr> {
    user_skills::Entity::delete_by_id((user_id, skill_id))
        .exec(db)
        .await
}

/// A user's held skills joined with their catalogue names.
pub async fn get_skills_with_names(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<SkillWithLevel>, DbErr> {
    let rows = user_skills::Entity::find()
        .filter(user_skills::Column::UserId.eq(user_id))
        .find_also_related(crate::models::skills::Entity)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(us, skill)| {
            skill.map(|s| SkillWithLevel {
                id: s.id,
                name: s.name,
                level: us.level,
            })
        })
        .collect())
}

/// The held-skill map the match scorer consumes.
pub async fn get_level_map(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<HashMap<Uuid, SkillLevel>, DbErr> {
    let rows = user_skills::Entity::find()
        .filter(user_skills::Column::UserId.eq(user_id))
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|us| (us.skill_id, us.level)).collect())
}
