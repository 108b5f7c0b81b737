use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::projects::ProjectSummary;
use super::users::UserSummary;

/// SeaORM entity for the `teams` table: confirmed membership, created only
/// by the acceptance side effect (never directly by a caller).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teams")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub role_title: String,
    pub joined_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Project,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTeamMember {
    pub role_title: String,
}

/// A team row with its member summary, for the project team view.
#[derive(Debug, Clone, Serialize)]
pub struct TeamMemberView {
    pub id: Uuid,
    pub role_title: String,
    pub joined_at: DateTimeUtc,
    pub user: UserSummary,
}

/// A team row with its project summary, for the caller's membership list.
#[derive(Debug, Clone, Serialize)]
pub struct MembershipView {
    pub id: Uuid,
    pub role_title: String,
    pub joined_at: DateTimeUtc,
    pub project: ProjectSummary,
}

/// A rateable member: team row annotated with any rating the owner already
/// left, so the client can show "already rated" without extra lookups.
#[derive(Debug, Clone, Serialize)]
pub struct RateableMember {
    pub team_id: Uuid,
    pub role_title: String,
    pub joined_at: DateTimeUtc,
    pub user: UserSummary,
    pub rating: Option<super::ratings::RatingView>,
}
