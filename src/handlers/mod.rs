pub mod auth;
pub mod projects;
pub mod skills;
pub mod teams;
pub mod users;

use actix_web::web;

use crate::notifications::session;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth routes (protected by JWT via the AuthenticatedUser extractor) ──
    cfg.service(web::scope("/auth").route("/me", web::get().to(auth::me)));

    // ── User routes ──
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(users::get_users))
            .route("/me/profile", web::put().to(users::update_my_profile))
            .route("/me/skills", web::get().to(users::get_my_skills))
            .route("/me/skills", web::post().to(users::add_skill))
            .route("/me/skills/{skill_id}", web::delete().to(users::remove_skill))
            .route("/{id}/profile", web::get().to(users::get_user_profile))
            .route("/{id}/skills", web::get().to(users::get_user_skills)),
    );

    // ── Skill catalogue ──
    cfg.service(
        web::scope("/skills")
            .route("", web::get().to(skills::get_skills))
            .route("", web::post().to(skills::create_skill))
            .route("/search", web::get().to(skills::search_skills))
            .route("/{id}", web::get().to(skills::get_skill))
            .route("/{id}", web::delete().to(skills::delete_skill)),
    );

    // ── Project + application workflow routes ──
    // Literal segments must register before the `{id}` routes.
    cfg.service(
        web::scope("/projects")
            .route("", web::get().to(projects::get_projects))
            .route("", web::post().to(projects::create_project))
            .route("/recommended", web::get().to(projects::get_recommended_projects))
            .route("/my-projects", web::get().to(projects::get_my_projects))
            .route("/my-applications", web::get().to(projects::get_my_applications))
            .route("/{id}", web::get().to(projects::get_project))
            .route("/{id}", web::put().to(projects::update_project))
            .route("/{id}", web::delete().to(projects::delete_project))
            .route("/{id}/applications", web::post().to(projects::apply_to_project))
            .route("/{id}/applications", web::get().to(projects::get_project_applications))
            .route(
                "/{project_id}/applications/{application_id}/status",
                web::put().to(projects::update_application_status),
            )
            .route("/{id}/ratings", web::post().to(projects::rate_user))
            .route("/{id}/rateable-members", web::get().to(projects::get_rateable_members)),
    );

    // ── Team routes ──
    cfg.service(
        web::scope("/teams")
            .route("/projects/{project_id}", web::get().to(teams::get_project_team))
            .route("/my-memberships", web::get().to(teams::get_my_memberships))
            .route(
                "/projects/{project_id}/members/{team_id}",
                web::put().to(teams::update_member_role),
            )
            .route(
                "/projects/{project_id}/members/{team_id}",
                web::delete().to(teams::remove_member),
            ),
    );

    // ── Realtime notification channel ──
    cfg.service(
        web::scope("/notifications").route("/ws", web::get().to(session::ws_connect)),
    );
}
