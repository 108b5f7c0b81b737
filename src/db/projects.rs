use sea_orm::*;
use uuid::Uuid;

use crate::matching::SkillRequirement;
use crate::models::projects::{self, CreateProject, ProjectSkillInput, ProjectStatus, RequiredSkillView, UpdateProject};
use crate::models::{project_skills, skills};

/// Insert a new project (defaults to Open status).
pub async fn insert_project(
    db: &impl ConnectionTrait,
    input: &CreateProject,
    owner_id: Uuid,
) -> Result<projects::Model, DbErr> {
    let new_project = projects::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title.clone()),
        description: Set(input.description.clone()),
        owner_id: Set(owner_id),
        status: Set(ProjectStatus::Open),
        created_at: Set(chrono::Utc::now()),
    };

    new_project.insert(db).await
}

/// Fetch a single project by ID.
pub async fn get_project_by_id(
    db: &impl ConnectionTrait,
    id: Uuid,
) -> Result<Option<projects::Model>, DbErr> {
    projects::Entity::find_by_id(id).one(db).await
}

/// All open projects, newest first.
pub async fn get_open_projects(db: &DatabaseConnection) -> Result<Vec<projects::Model>, DbErr> {
    projects::Entity::find()
        .filter(projects::Column::Status.eq(ProjectStatus::Open))
        .order_by_desc(projects::Column::CreatedAt)
        .all(db)
        .await
}

/// Recommendation candidates: open projects not owned by the caller,
/// newest first. Newest-first is also the tie-break order the scorer's
/// stable sort preserves for equal match percentages.
pub async fn get_recommendation_candidates(
    db: &DatabaseConnection,
    exclude_owner: Uuid,
) -> Result<Vec<projects::Model>, DbErr> {
    projects::Entity::find()
        .filter(projects::Column::Status.eq(ProjectStatus::Open))
        .filter(projects::Column::OwnerId.ne(exclude_owner))
        .order_by_desc(projects::Column::CreatedAt)
        .all(db)
        .await
}

/// Projects owned by a user, newest first.
pub async fn get_projects_by_owner(
    db: &DatabaseConnection,
    owner_id: Uuid,
) -> Result<Vec<projects::Model>, DbErr> {
    projects::Entity::find()
        .filter(projects::Column::OwnerId.eq(owner_id))
        .order_by_desc(projects::Column::CreatedAt)
        .all(db)
        .await
}

/// Update a project's own fields (required skills are replaced separately).
pub async fn update_project(
    db: &impl ConnectionTrait,
    project: projects::Model,
    input: &UpdateProject,
) -> Result<projects::Model, DbErr> {
    let mut active: projects::ActiveModel = project.into();

    if let Some(title) = &input.title {
        active.title = Set(title.clone());
    }
    if let Some(description) = &input.description {
        active.description = Set(Some(description.clone()));
    }
    if let Some(status) = input.status {
        active.status = Set(status);
    }

    active.update(db).await
}

/// Delete a project (FKs cascade applications, team rows, skills, ratings).
pub async fn delete_project(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    projects::Entity::delete_by_id(id).exec(db).await
}

// ── Required skills ──

/// Replace a project's required-skill set wholesale.
pub async fn replace_required_skills(
    db: &impl ConnectionTrait,
    project_id: Uuid,
    inputs: &[ProjectSkillInput],
) -> Result<(), DbErr> {
    project_skills::Entity::delete_many()
        .filter(project_skills::Column::ProjectId.eq(project_id))
        .exec(db)
        .await?;

    if inputs.is_empty() {
        return Ok(());
    }

    let rows = inputs.iter().map(|input| project_skills::ActiveModel {
        project_id: Set(project_id),
        skill_id: Set(input.skill_id),
        required_level: Set(input.required_level),
    });

    project_skills::Entity::insert_many(rows).exec(db).await?;
    Ok(())
}

/// A project's requirements joined with skill names, in scorer shape.
pub async fn get_requirements(
    db: &impl ConnectionTrait,
    project_id: Uuid,
) -> Result<Vec<SkillRequirement>, DbErr> {
    let rows = project_skills::Entity::find()
        .filter(project_skills::Column::ProjectId.eq(project_id))
        .find_also_related(skills::Entity)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(ps, skill)| {
            skill.map(|s| SkillRequirement {
                skill_id: ps.skill_id,
                skill_name: s.name,
                required_level: ps.required_level,
            })
        })
        .collect())
}

/// The same join in response shape.
pub async fn get_required_skill_views(
    db: &impl ConnectionTrait,
    project_id: Uuid,
) -> Result<Vec<RequiredSkillView>, DbErr> {
    let requirements = get_requirements(db, project_id).await?;
    Ok(requirements
        .into_iter()
        .map(|r| RequiredSkillView {
            skill_id: r.skill_id,
            name: r.skill_name,
            required_level: r.required_level,
        })
        .collect())
}
