use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{self, RedisCache};
use crate::db::projects as project_db;
use crate::db::teams as team_db;
use crate::db::users as user_db;
use crate::error::ApiError;
use crate::models::projects::ProjectSummary;
use crate::models::teams::{MembershipView, TeamMemberView, UpdateTeamMember};
use crate::models::users::UserSummary;
use crate::workflow::application as app_flow;

/// GET /api/teams/projects/{project_id} — a project's team in joining order.
pub async fn get_project_team(
    _caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let project_id = path.into_inner();
    project_db::get_project_by_id(db.get_ref(), project_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    let team: Vec<TeamMemberView> = team_db::get_team_with_members(db.get_ref(), project_id)
        .await?
        .into_iter()
        .filter_map(|(row, user)| {
            user.map(|u| TeamMemberView {
                id: row.id,
                role_title: row.role_title,
                joined_at: row.joined_at,
                user: UserSummary::from(u),
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(team))
}

/// GET /api/teams/my-memberships — the projects the caller belongs to,
/// most recently joined first.
pub async fn get_my_memberships(
    caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let rows = team_db::get_memberships_with_projects(db.get_ref(), caller.user.id).await?;

    let owner_ids: Vec<Uuid> = rows
        .iter()
        .filter_map(|(_, p)| p.as_ref().map(|p| p.owner_id))
        .collect();
    let owners = user_db::get_summaries(db.get_ref(), &owner_ids).await?;

    let memberships: Vec<MembershipView> = rows
        .into_iter()
        .filter_map(|(row, project)| {
            project.map(|p| {
                let owner = owners.get(&p.owner_id).cloned();
                MembershipView {
                    id: row.id,
                    role_title: row.role_title,
                    joined_at: row.joined_at,
                    project: ProjectSummary::from_model(p, owner),
                }
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(memberships))
}

/// PUT /api/teams/projects/{project_id}/members/{team_id} — the owner
/// renames a member's role title.
pub async fn update_member_role(
    caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<UpdateTeamMember>,
) -> Result<HttpResponse, ApiError> {
    let (project_id, team_id) = path.into_inner();

    let project = project_db::get_project_by_id(db.get_ref(), project_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;
    app_flow::ensure_owner(&project, caller.user.id, "manage team members")?;

    let member = team_db::get_member_for_project(db.get_ref(), team_id, project_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Team member not found"))?;

    let updated =
        team_db::update_role_title(db.get_ref(), member, body.into_inner().role_title).await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/teams/projects/{project_id}/members/{team_id} — the owner
/// removes a member from the team.
pub async fn remove_member(
    caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let (project_id, team_id) = path.into_inner();

    let project = project_db::get_project_by_id(db.get_ref(), project_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;
    app_flow::ensure_owner(&project, caller.user.id, "manage team members")?;

    let member = team_db::get_member_for_project(db.get_ref(), team_id, project_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Team member not found"))?;

    team_db::delete_member(db.get_ref(), member.id).await?;
    tracing::info!(team_id = %team_id, project_id = %project_id, "team member removed");

    let _ = cache
        .delete(&cache::keys::project(&project_id.to_string()))
        .await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Team member removed",
    })))
}
