use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::projects::ProjectSummary;
use super::users::UserSummary;

/// Application lifecycle status stored as a lowercase string.
///
/// `Accepted` and `Rejected` are terminal: the workflow refuses a second
/// status transition once an application has left `Pending`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// SeaORM entity for the `applications` table.
///
/// One row per (user, project) pair — the unique index on those columns is
/// the correctness guarantee, not the pre-insert check.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub project_id: Uuid,
    pub status: ApplicationStatus,
    pub created_at: DateTimeUtc,
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
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Project,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Request body for PUT .../applications/{id}/status.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateApplicationStatus {
    pub status: ApplicationStatus,
    /// Team role when accepting; defaults to "Team Member".
    pub role_title: Option<String>,
}

/// An application with its applicant summary, for the owner's review list.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationWithApplicant {
    pub id: Uuid,
    pub status: ApplicationStatus,
    pub created_at: DateTimeUtc,
    pub user: UserSummary,
}

/// An application with its project summary, for the applicant's own list.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationWithProject {
    pub id: Uuid,
    pub status: ApplicationStatus,
    pub created_at: DateTimeUtc,
    pub project: ProjectSummary,
}
