//! Integration test for the membership and rating workflow guards.
//!
//! Walks the whole lifecycle the way the handlers do: apply, accept or
//! reject, then rate after completion. Pure precondition checks over entity
//! models, so no database is needed.
//!
//! Run with: `cargo test --test workflow_test`
use chrono::Utc;
use uuid::Uuid;

use teamlink_backend::ApiError;
use teamlink_backend::models::applications::{self, ApplicationStatus};
use teamlink_backend::models::projects::{self, ProjectStatus};
use teamlink_backend::workflow::application::{
    ensure_can_apply, ensure_owner, ensure_transition, role_title_or_default,
};
use teamlink_backend::workflow::rating::{ensure_can_rate, ensure_score_in_range};

fn project(status: ProjectStatus, owner_id: Uuid) -> projects::Model {
    projects::Model {
        id: Uuid::new_v4(),
        title: "API gateway rewrite".to_string(),
        description: Some("Replace the legacy gateway".to_string()),
        owner_id,
        status,
        created_at: Utc::now(),
    }
}

fn application(project_id: Uuid, user_id: Uuid, status: ApplicationStatus) -> applications::Model {
    applications::Model {
        id: Uuid::new_v4(),
        user_id,
        project_id,
        status,
        created_at: Utc::now(),
    }
}

#[test]
fn full_acceptance_path_passes_every_gate() {
    let owner = Uuid::new_v4();
    let freelancer = Uuid::new_v4();
    let p = project(ProjectStatus::Open, owner);

    // Apply while open, no prior application.
    ensure_can_apply(&p, freelancer, false).unwrap();

    // The owner reviews and accepts.
    let app = application(p.id, freelancer, ApplicationStatus::Pending);
    ensure_owner(&p, owner, "manage applications").unwrap();
    ensure_transition(&app, ApplicationStatus::Accepted).unwrap();
    assert_eq!(role_title_or_default(None), "Team Member");

    // Accepted is terminal.
    let accepted = application(p.id, freelancer, ApplicationStatus::Accepted);
    assert!(ensure_transition(&accepted, ApplicationStatus::Rejected).is_err());
    assert!(ensure_transition(&accepted, ApplicationStatus::Pending).is_err());
}

#[test]
fn rejection_is_just_as_final() {
    let p = project(ProjectStatus::Open, Uuid::new_v4());
    let rejected = application(p.id, Uuid::new_v4(), ApplicationStatus::Rejected);

    assert!(ensure_transition(&rejected, ApplicationStatus::Accepted).is_err());
    assert!(ensure_transition(&rejected, ApplicationStatus::Rejected).is_err());
}

#[test]
fn applying_is_gated_on_status_ownership_and_duplicates() {
    let owner = Uuid::new_v4();
    let freelancer = Uuid::new_v4();

    // Not open.
    let in_progress = project(ProjectStatus::InProgress, owner);
    assert!(matches!(
        ensure_can_apply(&in_progress, freelancer, false),
        Err(ApiError::InvalidOperation(_))
    ));

    // Own project.
    let open = project(ProjectStatus::Open, owner);
    assert!(ensure_can_apply(&open, owner, false).is_err());

    // Second application.
    assert!(ensure_can_apply(&open, freelancer, true).is_err());

    // All clear.
    ensure_can_apply(&open, freelancer, false).unwrap();
}

#[test]
fn review_actions_are_owner_only() {
    let p = project(ProjectStatus::Open, Uuid::new_v4());
    let stranger = Uuid::new_v4();

    assert!(matches!(
        ensure_owner(&p, stranger, "manage applications"),
        Err(ApiError::Forbidden(_))
    ));
    assert!(matches!(
        ensure_owner(&p, stranger, "view applications"),
        Err(ApiError::Forbidden(_))
    ));
}

#[test]
fn rating_opens_only_after_completion() {
    let owner = Uuid::new_v4();
    let member = Uuid::new_v4();

    let active = project(ProjectStatus::InProgress, owner);
    assert!(ensure_can_rate(&active, owner, member, true, false).is_err());

    let done = project(ProjectStatus::Completed, owner);
    ensure_can_rate(&done, owner, member, true, false).unwrap();
}

#[test]
fn every_rating_precondition_has_a_distinct_refusal() {
    let owner = Uuid::new_v4();
    let member = Uuid::new_v4();
    let done = project(ProjectStatus::Completed, owner);

    // Non-owner raters are forbidden outright.
    assert!(matches!(
        ensure_can_rate(&done, Uuid::new_v4(), member, true, false),
        Err(ApiError::Forbidden(_))
    ));

    // Self-rating.
    assert!(ensure_can_rate(&done, owner, owner, true, false).is_err());

    // Target never joined the team.
    assert!(ensure_can_rate(&done, owner, member, false, false).is_err());

    // Second rating for the same member and project.
    assert!(ensure_can_rate(&done, owner, member, true, true).is_err());

    // Score bounds.
    assert!(ensure_score_in_range(0).is_err());
    assert!(ensure_score_in_range(6).is_err());
    ensure_score_in_range(3).unwrap();
}
