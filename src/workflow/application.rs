use uuid::Uuid;

use crate::error::ApiError;
use crate::models::applications::{self, ApplicationStatus};
use crate::models::projects::{self, ProjectStatus};

pub const DEFAULT_ROLE_TITLE: &str = "Team Member";

/// Ownership gate shared by every owner-only operation.
pub fn ensure_owner(project: &projects::Model, user_id: Uuid, action: &str) -> Result<(), ApiError> {
    if project.owner_id != user_id {
        return Err(ApiError::forbidden(format!(
            "You can only {action} for your own projects"
        )));
    }
    Ok(())
}

/// Preconditions for submitting an application:
/// the project must be open, the caller must not own it, and the caller must
/// not already hold an application for it.
pub fn ensure_can_apply(
    project: &projects::Model,
    applicant_id: Uuid,
    already_applied: bool,
) -> Result<(), ApiError> {
    if project.owner_id == applicant_id {
        return Err(ApiError::invalid("You cannot apply to your own project"));
    }
    if project.status != ProjectStatus::Open {
        return Err(ApiError::invalid(
            "This project is not accepting applications",
        ));
    }
    if already_applied {
        return Err(ApiError::invalid(
            "You have already applied to this project",
        ));
    }
    Ok(())
}

/// Accepted and rejected are terminal: once an application has left pending
/// there is no reversal transition, otherwise flipping accepted → rejected
/// would strand the team row the acceptance created.
pub fn ensure_transition(
    application: &applications::Model,
    new_status: ApplicationStatus,
) -> Result<(), ApiError> {
    if new_status == ApplicationStatus::Pending {
        return Err(ApiError::invalid(
            "An application cannot be moved back to pending",
        ));
    }
    if application.status != ApplicationStatus::Pending {
        let current = match application.status {
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Pending => unreachable!(),
        };
        return Err(ApiError::invalid(format!(
            "This application was already {current}"
        )));
    }
    Ok(())
}

/// Role title for the team row created on acceptance.
pub fn role_title_or_default(role_title: Option<String>) -> String {
    role_title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ROLE_TITLE.to_string())
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

    fn application(status: ApplicationStatus) -> applications::Model {
        applications::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn applying_requires_an_open_project() {
        let applicant = Uuid::new_v4();
        for status in [
            ProjectStatus::InProgress,
            ProjectStatus::Closed,
            ProjectStatus::Completed,
        ] {
            let p = project(status, Uuid::new_v4());
            match ensure_can_apply(&p, applicant, false) {
                Err(ApiError::InvalidOperation(_)) => {}
                other => panic!("expected InvalidOperation for {status:?}, got {other:?}"),
            }
        }

        let p = project(ProjectStatus::Open, Uuid::new_v4());
        assert!(ensure_can_apply(&p, applicant, false).is_ok());
    }

    #[test]
    fn owner_cannot_apply_to_own_project() {
        let owner = Uuid::new_v4();
        let p = project(ProjectStatus::Open, owner);
        match ensure_can_apply(&p, owner, false) {
            Err(ApiError::InvalidOperation(msg)) => {
                assert!(msg.contains("own project"));
            }
            other => panic!("expected InvalidOperation, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_application_is_rejected_with_a_named_reason() {
        let p = project(ProjectStatus::Open, Uuid::new_v4());
        match ensure_can_apply(&p, Uuid::new_v4(), true) {
            Err(ApiError::InvalidOperation(msg)) => {
                assert!(msg.contains("already applied"));
            }
            other => panic!("expected InvalidOperation, got {other:?}"),
        }
    }

    #[test]
    fn non_owner_is_forbidden() {
        let p = project(ProjectStatus::Open, Uuid::new_v4());
        match ensure_owner(&p, Uuid::new_v4(), "manage applications") {
            Err(ApiError::Forbidden(_)) => {}
            other => panic!("expected Forbidden, got {other:?}"),
        }
        assert!(ensure_owner(&p, p.owner_id, "manage applications").is_ok());
    }

    #[test]
    fn terminal_statuses_cannot_transition_again() {
        for terminal in [ApplicationStatus::Accepted, ApplicationStatus::Rejected] {
            let a = application(terminal);
            assert!(ensure_transition(&a, ApplicationStatus::Accepted).is_err());
            assert!(ensure_transition(&a, ApplicationStatus::Rejected).is_err());
        }
    }

    #[test]
    fn pending_can_be_accepted_or_rejected_but_not_re_pended() {
        let a = application(ApplicationStatus::Pending);
        assert!(ensure_transition(&a, ApplicationStatus::Accepted).is_ok());
        assert!(ensure_transition(&a, ApplicationStatus::Rejected).is_ok());
        assert!(ensure_transition(&a, ApplicationStatus::Pending).is_err());
    }

    #[test]
    fn role_title_defaults_when_omitted_or_blank() {
        assert_eq!(role_title_or_default(None), "Team Member");
        assert_eq!(role_title_or_default(Some("  ".into())), "Team Member");
        assert_eq!(
            role_title_or_default(Some("Backend Developer".into())),
            "Backend Developer"
        );
    }
}
