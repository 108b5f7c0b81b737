use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ordered proficiency level stored as a lowercase string.
///
/// The ordering matters for the match scorer: a held level satisfies a
/// requirement when its rank is at least the required rank.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    #[sea_orm(string_value = "beginner")]
    Beginner,
    #[sea_orm(string_value = "intermediate")]
    Intermediate,
    #[sea_orm(string_value = "expert")]
    Expert,
}

impl SkillLevel {
    pub fn rank(self) -> u8 {
        match self {
            SkillLevel::Beginner => 1,
            SkillLevel::Intermediate => 2,
            SkillLevel::Expert => 3,
        }
    }

    /// "At least as proficient as required" — ordinal, not exact-match.
    pub fn satisfies(self, required: SkillLevel) -> bool {
        self.rank() >= required.rank()
    }
}

/// SeaORM entity for the `user_skills` table: one row per (user, skill).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_skills")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub skill_id: Uuid,
    pub level: SkillLevel,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::skills::Entity",
        from = "Column::SkillId",
        to = "super::skills::Column::Id"
    )]
    Skill,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::skills::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Skill.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Request body for adding (or re-levelling) a held skill.
#[derive(Debug, Clone, Deserialize)]
pub struct AddSkill {
    pub skill_id: Uuid,
    pub level: SkillLevel,
}

/// A held skill joined with its catalogue entry. Deserialize too: this is
/// embedded in the cached profile shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillWithLevel {
    pub id: Uuid,
    pub name: String,
    pub level: SkillLevel,
}

#[cfg(test)]
mod tests {
    use super::SkillLevel::*;

    #[test]
    fn levels_are_totally_ordered() {
        assert!(Beginner.rank() < Intermediate.rank());
        assert!(Intermediate.rank() < Expert.rank());
    }

    #[test]
    fn satisfies_is_at_least_not_exact() {
        assert!(Expert.satisfies(Beginner));
        assert!(Expert.satisfies(Intermediate));
        assert!(Expert.satisfies(Expert));
        assert!(Intermediate.satisfies(Beginner));
        assert!(!Beginner.satisfies(Expert));
        assert!(!Beginner.satisfies(Intermediate));
        assert!(!Intermediate.satisfies(Expert));
    }
}
