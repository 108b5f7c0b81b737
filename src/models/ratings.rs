use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `ratings` table: one row per
/// (rater, rated user, project), never mutated or deleted after insert.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ratings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub rater_id: Uuid,
    pub rated_user_id: Uuid,
    pub project_id: Uuid,
    pub score: i32,
    pub comment: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::RaterId",
        to = "super::users::Column::Id"
    )]
    Rater,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::RatedUserId",
        to = "super::users::Column::Id"
    )]
    RatedUser,
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Project,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Request body for POST /api/projects/{id}/ratings.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRating {
    pub rated_user_id: Uuid,
    pub score: i32,
    pub comment: Option<String>,
}

/// An existing rating as embedded in rateable-member responses.
#[derive(Debug, Clone, Serialize)]
pub struct RatingView {
    pub score: i32,
    pub comment: Option<String>,
    pub created_at: DateTimeUtc,
}

impl From<Model> for RatingView {
    fn from(m: Model) -> Self {
        Self {
            score: m.score,
            comment: m.comment,
            created_at: m.created_at,
        }
    }
}
