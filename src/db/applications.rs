use sea_orm::*;
use uuid::Uuid;

use crate::models::applications::{self, ApplicationStatus};
use crate::models::{projects, users};

/// Insert a new application (defaults to Pending status). The unique index
/// on (user_id, project_id) is what actually enforces one-per-pair.
pub async fn insert_application(
    db: &impl ConnectionTrait,
    user_id: Uuid,
    project_id: Uuid,
) -> Result<applications::Model, DbErr> {
    let new_application = applications::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        project_id: Set(project_id),
        status: Set(ApplicationStatus::Pending),
        created_at: Set(chrono::Utc::now()),
    };

    new_application.insert(db).await
}

/// The friendly-error pre-check before insert.
pub async fn application_exists(
    db: &impl ConnectionTrait,
    user_id: Uuid,
    project_id: Uuid,
) -> Result<bool, DbErr> {
    let found = applications::Entity::find()
        .filter(applications::Column::UserId.eq(user_id))
        .filter(applications::Column::ProjectId.eq(project_id))
        .one(db)
        .await?;
    Ok(found.is_some())
}

/// Fetch an application scoped to its project (NotFound when the id exists
/// but belongs to a different project).
pub async fn get_application_for_project(
    db: &impl ConnectionTrait,
    application_id: Uuid,
    project_id: Uuid,
) -> Result<Option<applications::Model>, DbErr> {
    applications::Entity::find_by_id(application_id)
        .filter(applications::Column::ProjectId.eq(project_id))
        .one(db)
        .await
}

/// All applications for a project with their applicants, oldest first.
pub async fn get_applications_with_applicants(
    db: &DatabaseConnection,
    project_id: Uuid,
) -> Result<Vec<(applications::Model, Option<users::Model>)>, DbErr> {
    applications::Entity::find()
        .filter(applications::Column::ProjectId.eq(project_id))
        .find_also_related(users::Entity)
        .order_by_asc(applications::Column::CreatedAt)
        .all(db)
        .await
}

/// A user's applications with their projects, newest first.
pub async fn get_applications_with_projects(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<(applications::Model, Option<projects::Model>)>, DbErr> {
    applications::Entity::find()
        .filter(applications::Column::UserId.eq(user_id))
        .find_also_related(projects::Entity)
        .order_by_desc(applications::Column::CreatedAt)
        .all(db)
        .await
}

/// Set an application's status.
pub async fn set_status(
    db: &impl ConnectionTrait,
    application: applications::Model,
    status: ApplicationStatus,
) -> Result<applications::Model, DbErr> {
    let mut active: applications::ActiveModel = application.into();
    active.status = Set(status);
    active.update(db).await
}
