use sea_orm::*;
use uuid::Uuid;

use crate::models::teams;
use crate::models::{projects, users};

/// Insert a team row. Only the acceptance workflow calls this — callers
/// never create memberships directly. The unique (project_id, user_id) index
/// backs the one-membership-per-project invariant.
pub async fn insert_member(
    db: &impl ConnectionTrait,
    project_id: Uuid,
    user_id: Uuid,
    role_title: String,
) -> Result<teams::Model, DbErr> {
    let new_member = teams::ActiveModel {
        id: Set(Uuid::new_v4()),
        project_id: Set(project_id),
        user_id: Set(user_id),
        role_title: Set(role_title),
        joined_at: Set(chrono::Utc::now()),
    };

    new_member.insert(db).await
}

/// The idempotency guard for the acceptance side effect.
pub async fn find_by_project_and_user(
    db: &impl ConnectionTrait,
    project_id: Uuid,
    user_id: Uuid,
) -> Result<Option<teams::Model>, DbErr> {
    teams::Entity::find()
        .filter(teams::Column::ProjectId.eq(project_id))
        .filter(teams::Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// A project's team with member summaries, in joining order.
pub async fn get_team_with_members(
    db: &impl ConnectionTrait,
    project_id: Uuid,
) -> Result<Vec<(teams::Model, Option<users::Model>)>, DbErr> {
    teams::Entity::find()
        .filter(teams::Column::ProjectId.eq(project_id))
        .find_also_related(users::Entity)
        .order_by_asc(teams::Column::JoinedAt)
        .all(db)
        .await
}

/// A user's memberships with their projects, most recent first.
pub async fn get_memberships_with_projects(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<(teams::Model, Option<projects::Model>)>, DbErr> {
    teams::Entity::find()
        .filter(teams::Column::UserId.eq(user_id))
        .find_also_related(projects::Entity)
        .order_by_desc(teams::Column::JoinedAt)
        .all(db)
        .await
}

/// Fetch a team row scoped to its project.
pub async fn get_member_for_project(
    db: &DatabaseConnection,
    team_id: Uuid,
    project_id: Uuid,
) -> Result<Option<teams::Model>, DbErr> {
    teams::Entity::find_by_id(team_id)
        .filter(teams::Column::ProjectId.eq(project_id))
        .one(db)
        .await
}

/// Update a member's role title.
pub async fn update_role_title(
    db: &DatabaseConnection,
    member: teams::Model,
    role_title: String,
) -> Result<teams::Model, DbErr> {
    let mut active: teams::ActiveModel = member.into();
    active.role_title = Set(role_title);
    active.update(db).await
}

/// Remove a member from a team.
pub async fn delete_member(db: &DatabaseConnection, team_id: Uuid) -> Result<DeleteResult, DbErr> {
    teams::Entity::delete_by_id(team_id).exec(db).await
}
