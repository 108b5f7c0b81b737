use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::user_skills::SkillLevel;
use super::users::UserSummary;

/// Project lifecycle status stored as a lowercase string.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "closed")]
    Closed,
    #[sea_orm(string_value = "completed")]
    Completed,
}

/// SeaORM entity for the `projects` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub status: ProjectStatus,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::applications::Entity")]
    Applications,
    #[sea_orm(has_many = "super::teams::Entity")]
    Team,
    #[sea_orm(has_many = "super::project_skills::Entity")]
    ProjectSkills,
    #[sea_orm(has_many = "super::ratings::Entity")]
    Ratings,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::applications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applications.def()
    }
}

impl Related<super::teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl Related<super::project_skills::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectSkills.def()
    }
}

impl Related<super::ratings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// One required skill on a project create/update request.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSkillInput {
    pub skill_id: Uuid,
    pub required_level: SkillLevel,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub title: String,
    pub description: Option<String>,
    /// Required skills to seed the project with; replace-all on update.
    pub skills: Option<Vec<ProjectSkillInput>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub skills: Option<Vec<ProjectSkillInput>>,
}

/// A required skill joined with its catalogue name, for project responses.
#[derive(Debug, Clone, Serialize)]
pub struct RequiredSkillView {
    pub skill_id: Uuid,
    pub name: String,
    pub required_level: SkillLevel,
}

/// The short project shape embedded in application/membership responses.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub created_at: DateTimeUtc,
    pub owner: Option<UserSummary>,
}

impl ProjectSummary {
    pub fn from_model(project: Model, owner: Option<UserSummary>) -> Self {
        Self {
            id: project.id,
            title: project.title,
            description: project.description,
            status: project.status,
            created_at: project.created_at,
            owner,
        }
    }
}

/// Listing shape: project plus owner summary and required skills.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithOwner {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub created_at: DateTimeUtc,
    pub owner: Option<UserSummary>,
    pub skills: Vec<RequiredSkillView>,
}

/// Detail shape: everything a project page needs in one response.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub created_at: DateTimeUtc,
    pub owner: Option<UserSummary>,
    pub skills: Vec<RequiredSkillView>,
    pub applications: Vec<super::applications::ApplicationWithApplicant>,
    pub team: Vec<super::teams::TeamMemberView>,
}
