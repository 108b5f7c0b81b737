use uuid::Uuid;

use crate::error::ApiError;
use crate::models::projects::{self, ProjectStatus};

/// Preconditions for the owner rating a team member, checked in order:
/// ownership, project completed, not rating yourself, target actually on the
/// team, and no prior rating for this (rater, rated, project) triple.
pub fn ensure_can_rate(
    project: &projects::Model,
    rater_id: Uuid,
    rated_user_id: Uuid,
    target_is_member: bool,
    already_rated: bool,
) -> Result<(), ApiError> {
    if project.owner_id != rater_id {
        return Err(ApiError::forbidden(
            "Only the project owner can rate team members",
        ));
    }
    if project.status != ProjectStatus::Completed {
        return Err(ApiError::invalid(
            "You can only rate users after the project is completed",
        ));
    }
    if rated_user_id == rater_id {
        return Err(ApiError::invalid("You cannot rate yourself"));
    }
    if !target_is_member {
        return Err(ApiError::invalid(
            "You can only rate members of this project's team",
        ));
    }
    if already_rated {
        return Err(ApiError::invalid(
            "You have already rated this user for this project",
        ));
    }
    Ok(())
}

/// Score range check at the input boundary.
pub fn ensure_score_in_range(score: i32) -> Result<(), ApiError> {
    if !(1..=5).contains(&score) {
        return Err(ApiError::invalid("Score must be between 1 and 5"));
    }
    Ok(())
}

/// The rateable-members listing has the same ownership/status gates as
/// rating itself, without a specific target.
pub fn ensure_can_view_rateable(
    project: &projects::Model,
    caller_id: Uuid,
) -> Result<(), ApiError> {
    if project.owner_id != caller_id {
        return Err(ApiError::forbidden(
            "Only the project owner can view rateable members",
        ));
    }
    if project.status != ProjectStatus::Completed {
        return Err(ApiError::invalid(
            "Team members can be rated only after the project is completed",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn project(status: ProjectStatus, owner_id: Uuid) -> projects::Model {
        projects::Model {
            id: Uuid::new_v4(),
            title: "Test project".into(),
            description: None,
            owner_id,
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn only_completed_projects_can_be_rated() {
        let owner = Uuid::new_v4();
        let target = Uuid::new_v4();
        for status in [
            ProjectStatus::Open,
            ProjectStatus::InProgress,
            ProjectStatus::Closed,
        ] {
            let p = project(status, owner);
            match ensure_can_rate(&p, owner, target, true, false) {
                Err(ApiError::InvalidOperation(msg)) => {
                    assert!(msg.contains("completed"));
                }
                other => panic!("expected InvalidOperation for {status:?}, got {other:?}"),
            }
        }

        let p = project(ProjectStatus::Completed, owner);
        assert!(ensure_can_rate(&p, owner, target, true, false).is_ok());
    }

    #[test]
    fn non_owner_is_forbidden_before_state_checks() {
        // Ownership is checked first, even on a non-completed project.
        let p = project(ProjectStatus::Open, Uuid::new_v4());
        match ensure_can_rate(&p, Uuid::new_v4(), Uuid::new_v4(), true, false) {
            Err(ApiError::Forbidden(_)) => {}
            other => panic!("expected Forbidden, got {other:?}"),
        }
    }

    #[test]
    fn self_rating_is_rejected() {
        let owner = Uuid::new_v4();
        let p = project(ProjectStatus::Completed, owner);
        match ensure_can_rate(&p, owner, owner, true, false) {
            Err(ApiError::InvalidOperation(msg)) => assert!(msg.contains("yourself")),
            other => panic!("expected InvalidOperation, got {other:?}"),
        }
    }

    #[test]
    fn non_member_target_is_rejected() {
        let owner = Uuid::new_v4();
        let p = project(ProjectStatus::Completed, owner);
        match ensure_can_rate(&p, owner, Uuid::new_v4(), false, false) {
            Err(ApiError::InvalidOperation(msg)) => assert!(msg.contains("team")),
            other => panic!("expected InvalidOperation, got {other:?}"),
        }
    }

    #[test]
    fn second_rating_for_the_same_pair_is_rejected() {
        let owner = Uuid::new_v4();
        let p = project(ProjectStatus::Completed, owner);
        match ensure_can_rate(&p, owner, Uuid::new_v4(), true, true) {
            Err(ApiError::InvalidOperation(msg)) => assert!(msg.contains("already rated")),
            other => panic!("expected InvalidOperation, got {other:?}"),
        }
    }

    #[test]
    fn score_range_is_validated_at_the_boundary() {
        assert!(ensure_score_in_range(0).is_err());
        assert!(ensure_score_in_range(6).is_err());
        for s in 1..=5 {
            assert!(ensure_score_in_range(s).is_ok());
        }
    }

    #[test]
    fn rateable_listing_has_the_same_gates() {
        let owner = Uuid::new_v4();
        let p = project(ProjectStatus::InProgress, owner);
        assert!(matches!(
            ensure_can_view_rateable(&p, owner),
            Err(ApiError::InvalidOperation(_))
        ));
        assert!(matches!(
            ensure_can_view_rateable(&p, Uuid::new_v4()),
            Err(ApiError::Forbidden(_))
        ));

        let done = project(ProjectStatus::Completed, owner);
        assert!(ensure_can_view_rateable(&done, owner).is_ok());
    }
}
