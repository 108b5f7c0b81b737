use actix_web::{HttpResponse, web};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{self, CacheConfig, RedisCache};
use crate::db::applications as application_db;
use crate::db::projects as project_db;
use crate::db::ratings as rating_db;
use crate::db::skills as skill_db;
use crate::db::teams as team_db;
use crate::db::user_skills as user_skill_db;
use crate::db::users as user_db;
use crate::error::ApiError;
use crate::matching::{self, MatchScore};
use crate::models::applications::{
    ApplicationStatus, ApplicationWithApplicant, ApplicationWithProject, UpdateApplicationStatus,
};
use crate::models::projects::{
    CreateProject, ProjectDetail, ProjectSkillInput, ProjectStatus, ProjectSummary,
    ProjectWithOwner, UpdateProject,
};
use crate::models::ratings::{CreateRating, RatingView};
use crate::models::teams::{RateableMember, TeamMemberView};
use crate::models::users::UserSummary;
use crate::notifications::events::Notification;
use crate::notifications::hub::NotificationHub;
use crate::workflow::application as app_flow;
use crate::workflow::rating as rating_flow;

/// Load a project or fail with NotFound.
async fn load_project(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<crate::models::projects::Model, ApiError> {
    project_db::get_project_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))
}

/// Skill inputs must reference existing catalogue entries; checked up front
/// so the caller gets a NotFound naming the skill instead of an FK error.
async fn ensure_skills_exist(
    db: &DatabaseConnection,
    inputs: &[ProjectSkillInput],
) -> Result<(), ApiError> {
    for input in inputs {
        if skill_db::get_skill_by_id(db, input.skill_id).await?.is_none() {
            return Err(ApiError::not_found(format!(
                "Skill {} not found",
                input.skill_id
            )));
        }
    }
    Ok(())
}

// ── Project CRUD ──

/// POST /api/projects — create a project (leaders only). Optional required
/// skills are inserted in the same transaction.
pub async fn create_project(
    caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    body: web::Json<CreateProject>,
) -> Result<HttpResponse, ApiError> {
    caller.require_leader()?;
    let input = body.into_inner();

    if let Some(skills) = &input.skills {
        ensure_skills_exist(db.get_ref(), skills).await?;
    }

    let txn = db.get_ref().begin().await?;
    let project = project_db::insert_project(&txn, &input, caller.user.id).await?;
    if let Some(skills) = &input.skills {
        project_db::replace_required_skills(&txn, project.id, skills).await?;
    }
    txn.commit().await?;

    tracing::info!(project_id = %project.id, owner = %caller.user.id, "project created");
    let _ = cache.delete(&cache::keys::open_projects()).await;

    let skills = project_db::get_required_skill_views(db.get_ref(), project.id).await?;
    Ok(HttpResponse::Created().json(ProjectWithOwner {
        id: project.id,
        title: project.title,
        description: project.description,
        status: project.status,
        created_at: project.created_at,
        owner: Some(UserSummary::from(caller.user)),
        skills,
    }))
}

/// GET /api/projects — all open projects with owner and required skills.
/// Cached briefly; invalidated on any project mutation.
pub async fn get_projects(
    _caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
) -> Result<HttpResponse, ApiError> {
    let cache_key = cache::keys::open_projects();
    if let Ok(Some(cached)) = cache.get::<serde_json::Value>(&cache_key).await {
        return Ok(HttpResponse::Ok().json(cached));
    }

    let projects = project_db::get_open_projects(db.get_ref()).await?;
    let owner_ids: Vec<Uuid> = projects.iter().map(|p| p.owner_id).collect();
    let owners = user_db::get_summaries(db.get_ref(), &owner_ids).await?;

    let mut out = Vec::with_capacity(projects.len());
    for project in projects {
        let skills = project_db::get_required_skill_views(db.get_ref(), project.id).await?;
        out.push(ProjectWithOwner {
            id: project.id,
            title: project.title,
            description: project.description,
            status: project.status,
            created_at: project.created_at,
            owner: owners.get(&project.owner_id).cloned(),
            skills,
        });
    }

    let ttl = CacheConfig::from_env().project_list_ttl.as_secs();
    let _ = cache.set(&cache_key, &out, Some(ttl)).await;

    Ok(HttpResponse::Ok().json(out))
}

/// GET /api/projects/{id} — full detail: owner, required skills,
/// applications with applicants, and the team. Cached; every mutation that
/// touches the project invalidates the key.
pub async fn get_project(
    _caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let project_id = path.into_inner();

    let cache_key = cache::keys::project(&project_id.to_string());
    if let Ok(Some(cached)) = cache.get::<serde_json::Value>(&cache_key).await {
        return Ok(HttpResponse::Ok().json(cached));
    }

    let project = load_project(db.get_ref(), project_id).await?;

    let owner = user_db::get_user_by_id(db.get_ref(), project.owner_id)
        .await?
        .map(UserSummary::from);
    let skills = project_db::get_required_skill_views(db.get_ref(), project.id).await?;

    let applications = application_db::get_applications_with_applicants(db.get_ref(), project.id)
        .await?
        .into_iter()
        .filter_map(|(app, user)| {
            user.map(|u| ApplicationWithApplicant {
                id: app.id,
                status: app.status,
                created_at: app.created_at,
                user: UserSummary::from(u),
            })
        })
        .collect();

    let team = team_db::get_team_with_members(db.get_ref(), project.id)
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

    let detail = ProjectDetail {
        id: project.id,
        title: project.title,
        description: project.description,
        status: project.status,
        created_at: project.created_at,
        owner,
        skills,
        applications,
        team,
    };

    let ttl = CacheConfig::from_env().project_ttl.as_secs();
    let _ = cache.set(&cache_key, &detail, Some(ttl)).await;

    Ok(HttpResponse::Ok().json(detail))
}

/// PUT /api/projects/{id} — owner-only update of title/description/status;
/// a skills list replaces the required set wholesale.
pub async fn update_project(
    caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProject>,
) -> Result<HttpResponse, ApiError> {
    let project = load_project(db.get_ref(), path.into_inner()).await?;
    app_flow::ensure_owner(&project, caller.user.id, "update projects")?;

    let input = body.into_inner();
    if let Some(skills) = &input.skills {
        ensure_skills_exist(db.get_ref(), skills).await?;
    }

    let project_id = project.id;
    let txn = db.get_ref().begin().await?;
    let updated = project_db::update_project(&txn, project, &input).await?;
    if let Some(skills) = &input.skills {
        project_db::replace_required_skills(&txn, project_id, skills).await?;
    }
    txn.commit().await?;

    let _ = cache.delete(&cache::keys::open_projects()).await;
    let _ = cache
        .delete(&cache::keys::project(&project_id.to_string()))
        .await;

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/projects/{id} — owner-only; the schema cascades
/// applications, team rows, required skills, and ratings.
pub async fn delete_project(
    caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let project = load_project(db.get_ref(), path.into_inner()).await?;
    app_flow::ensure_owner(&project, caller.user.id, "delete projects")?;

    project_db::delete_project(db.get_ref(), project.id).await?;
    tracing::info!(project_id = %project.id, "project deleted");

    let _ = cache.delete(&cache::keys::open_projects()).await;
    let _ = cache
        .delete(&cache::keys::project(&project.id.to_string()))
        .await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Project deleted",
    })))
}

/// GET /api/projects/my-projects — the caller's owned projects (leaders).
pub async fn get_my_projects(
    caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    caller.require_leader()?;

    let projects = project_db::get_projects_by_owner(db.get_ref(), caller.user.id).await?;

    let mut out = Vec::with_capacity(projects.len());
    for project in projects {
        let skills = project_db::get_required_skill_views(db.get_ref(), project.id).await?;
        out.push(ProjectWithOwner {
            id: project.id,
            title: project.title,
            description: project.description,
            status: project.status,
            created_at: project.created_at,
            owner: None,
            skills,
        });
    }

    Ok(HttpResponse::Ok().json(out))
}

// ── Application workflow ──

/// POST /api/projects/{id}/applications — a freelancer applies.
///
/// The project must be open, the caller must not own it, and one
/// application per (user, project) is allowed. The unique index is the
/// real guard; the pre-check only shapes the error.
pub async fn apply_to_project(
    caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    hub: web::Data<Arc<NotificationHub>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    caller.require_freelancer()?;

    let project = load_project(db.get_ref(), path.into_inner()).await?;
    let already_applied =
        application_db::application_exists(db.get_ref(), caller.user.id, project.id).await?;

    app_flow::ensure_can_apply(&project, caller.user.id, already_applied)?;

    let application = application_db::insert_application(db.get_ref(), caller.user.id, project.id)
        .await
        .map_err(|e| ApiError::from_insert(e, "You have already applied to this project"))?;

    tracing::info!(
        application_id = %application.id,
        project_id = %project.id,
        applicant = %caller.user.id,
        "application submitted"
    );

    let _ = cache
        .delete(&cache::keys::project(&project.id.to_string()))
        .await;

    hub.notify(
        project.owner_id,
        Notification::application_received(
            application.id,
            project.id,
            &project.title,
            &caller.user.username,
        ),
    )
    .await;

    Ok(HttpResponse::Created().json(application))
}

/// GET /api/projects/{id}/applications — owner-only review list with
/// applicant summaries.
pub async fn get_project_applications(
    caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let project = load_project(db.get_ref(), path.into_inner()).await?;
    app_flow::ensure_owner(&project, caller.user.id, "view applications")?;

    let applications: Vec<ApplicationWithApplicant> =
        application_db::get_applications_with_applicants(db.get_ref(), project.id)
            .await?
            .into_iter()
            .filter_map(|(app, user)| {
                user.map(|u| ApplicationWithApplicant {
                    id: app.id,
                    status: app.status,
                    created_at: app.created_at,
                    user: UserSummary::from(u),
                })
            })
            .collect();

    Ok(HttpResponse::Ok().json(applications))
}

/// PUT /api/projects/{project_id}/applications/{application_id}/status —
/// the owner accepts or rejects a pending application.
///
/// Acceptance creates the team row (idempotently) in the same transaction
/// as the status flip, so a crash between the two writes can't leave an
/// accepted application without its membership.
pub async fn update_application_status(
    caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    hub: web::Data<Arc<NotificationHub>>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<UpdateApplicationStatus>,
) -> Result<HttpResponse, ApiError> {
    let (project_id, application_id) = path.into_inner();
    let input = body.into_inner();

    let project = load_project(db.get_ref(), project_id).await?;
    app_flow::ensure_owner(&project, caller.user.id, "manage applications")?;

    let application =
        application_db::get_application_for_project(db.get_ref(), application_id, project_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Application not found"))?;

    app_flow::ensure_transition(&application, input.status)?;

    let applicant_id = application.user_id;
    let role_title = app_flow::role_title_or_default(input.role_title);

    let txn = db.get_ref().begin().await?;
    let updated = application_db::set_status(&txn, application, input.status).await?;
    if input.status == ApplicationStatus::Accepted
        && team_db::find_by_project_and_user(&txn, project_id, applicant_id)
            .await?
            .is_none()
    {
        team_db::insert_member(&txn, project_id, applicant_id, role_title.clone())
            .await
            .map_err(|e| ApiError::from_insert(e, "This user is already a team member"))?;
    }
    txn.commit().await?;

    tracing::info!(
        application_id = %updated.id,
        project_id = %project_id,
        status = ?updated.status,
        "application status updated"
    );

    let _ = cache
        .delete(&cache::keys::project(&project_id.to_string()))
        .await;

    let notification = match updated.status {
        ApplicationStatus::Accepted => Some(Notification::application_accepted(
            applicant_id,
            project_id,
            &project.title,
            &role_title,
        )),
        ApplicationStatus::Rejected => Some(Notification::application_rejected(
            applicant_id,
            project_id,
            &project.title,
        )),
        ApplicationStatus::Pending => None,
    };
    if let Some(n) = notification {
        hub.notify(applicant_id, n).await;
    }

    Ok(HttpResponse::Ok().json(updated))
}

/// GET /api/projects/my-applications — the caller's applications with
/// project summaries (freelancers).
pub async fn get_my_applications(
    caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    caller.require_freelancer()?;

    let rows =
        application_db::get_applications_with_projects(db.get_ref(), caller.user.id).await?;

    let owner_ids: Vec<Uuid> = rows
        .iter()
        .filter_map(|(_, p)| p.as_ref().map(|p| p.owner_id))
        .collect();
    let owners = user_db::get_summaries(db.get_ref(), &owner_ids).await?;

    let out: Vec<ApplicationWithProject> = rows
        .into_iter()
        .filter_map(|(app, project)| {
            project.map(|p| {
                let owner = owners.get(&p.owner_id).cloned();
                ApplicationWithProject {
                    id: app.id,
                    status: app.status,
                    created_at: app.created_at,
                    project: ProjectSummary::from_model(p, owner),
                }
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(out))
}

// ── Recommendations ──

/// One recommended project in scorer output order.
#[derive(Debug, Serialize)]
pub struct RecommendedProject {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub owner: Option<UserSummary>,
    #[serde(flatten)]
    pub score: MatchScore,
}

/// GET /api/projects/recommended — open projects ranked by how well the
/// caller's skills satisfy their requirements (freelancers).
///
/// A caller with no skills gets an empty list without touching the
/// candidate set; zero-match and zero-requirement projects are excluded.
pub async fn get_recommended_projects(
    caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    caller.require_freelancer()?;

    let held = user_skill_db::get_level_map(db.get_ref(), caller.user.id).await?;
    if held.is_empty() {
        return Ok(HttpResponse::Ok().json(Vec::<RecommendedProject>::new()));
    }

    let candidates =
        project_db::get_recommendation_candidates(db.get_ref(), caller.user.id).await?;

    let mut scored = Vec::new();
    for project in candidates {
        let requirements = project_db::get_requirements(db.get_ref(), project.id).await?;
        if let Some(score) = matching::score_project(&held, &requirements) {
            scored.push((project, score));
        }
    }
    matching::rank_by_match(&mut scored);

    let owner_ids: Vec<Uuid> = scored.iter().map(|(p, _)| p.owner_id).collect();
    let owners = user_db::get_summaries(db.get_ref(), &owner_ids).await?;

    let out: Vec<RecommendedProject> = scored
        .into_iter()
        .map(|(p, score)| RecommendedProject {
            id: p.id,
            title: p.title,
            description: p.description,
            status: p.status,
            created_at: p.created_at,
            owner: owners.get(&p.owner_id).cloned(),
            score,
        })
        .collect();

    Ok(HttpResponse::Ok().json(out))
}

// ── Ratings ──

/// POST /api/projects/{id}/ratings — the owner rates a team member after
/// completion. One rating per (rater, rated, project), enforced by the
/// unique index with the pre-check shaping the error.
pub async fn rate_user(
    caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
    body: web::Json<CreateRating>,
) -> Result<HttpResponse, ApiError> {
    caller.require_leader()?;
    let input = body.into_inner();
    rating_flow::ensure_score_in_range(input.score)?;

    let project = load_project(db.get_ref(), path.into_inner()).await?;

    let target_is_member =
        team_db::find_by_project_and_user(db.get_ref(), project.id, input.rated_user_id)
            .await?
            .is_some();
    let already_rated =
        rating_db::find_by_triple(db.get_ref(), caller.user.id, input.rated_user_id, project.id)
            .await?
            .is_some();

    rating_flow::ensure_can_rate(
        &project,
        caller.user.id,
        input.rated_user_id,
        target_is_member,
        already_rated,
    )?;

    let rating = rating_db::insert_rating(
        db.get_ref(),
        caller.user.id,
        input.rated_user_id,
        project.id,
        input.score,
        input.comment,
    )
    .await
    .map_err(|e| ApiError::from_insert(e, "You have already rated this user for this project"))?;

    tracing::info!(
        rating_id = %rating.id,
        project_id = %project.id,
        rated_user = %rating.rated_user_id,
        "rating created"
    );

    // The rated user's profile aggregate just changed.
    let _ = cache
        .delete(&cache::keys::profile(&rating.rated_user_id.to_string()))
        .await;

    Ok(HttpResponse::Created().json(rating))
}

/// GET /api/projects/{id}/rateable-members — owner-only list of team
/// members (excluding the owner), each annotated with any existing rating.
pub async fn get_rateable_members(
    caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    caller.require_leader()?;

    let project = load_project(db.get_ref(), path.into_inner()).await?;
    rating_flow::ensure_can_view_rateable(&project, caller.user.id)?;

    let team = team_db::get_team_with_members(db.get_ref(), project.id).await?;
    let existing = rating_db::get_by_project_and_rater(db.get_ref(), project.id, caller.user.id)
        .await?;

    let members: Vec<RateableMember> = team
        .into_iter()
        .filter(|(row, _)| row.user_id != caller.user.id)
        .filter_map(|(row, user)| {
            user.map(|u| RateableMember {
                team_id: row.id,
                role_title: row.role_title,
                joined_at: row.joined_at,
                rating: existing.get(&u.id).cloned().map(RatingView::from),
                user: UserSummary::from(u),
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(members))
}
