use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Workflow events pushed over the notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ApplicationReceived,
    ApplicationAccepted,
    ApplicationRejected,
}

/// The fixed payload shape delivered to a single recipient.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// To the project owner when a freelancer applies.
    pub fn application_received(
        application_id: Uuid,
        project_id: Uuid,
        project_title: &str,
        applicant_name: &str,
    ) -> Self {
        Self {
            id: format!("app_received_{application_id}"),
            kind: NotificationKind::ApplicationReceived,
            title: "New application received".to_string(),
            message: format!("{applicant_name} has applied to your project \"{project_title}\""),
            data: serde_json::json!({
                "projectId": project_id,
                "projectTitle": project_title,
                "applicantName": applicant_name,
                "applicationId": application_id,
            }),
            timestamp: Utc::now(),
        }
    }

    /// To the applicant when their application is accepted.
    pub fn application_accepted(
        freelancer_id: Uuid,
        project_id: Uuid,
        project_title: &str,
        role_title: &str,
    ) -> Self {
        Self {
            id: format!("app_accepted_{project_id}_{freelancer_id}"),
            kind: NotificationKind::ApplicationAccepted,
            title: "Application accepted".to_string(),
            message: format!(
                "Congratulations! You've been accepted to join \"{project_title}\" as {role_title}"
            ),
            data: serde_json::json!({
                "projectId": project_id,
                "projectTitle": project_title,
                "roleTitle": role_title,
            }),
            timestamp: Utc::now(),
        }
    }

    /// To the applicant when their application is rejected.
    pub fn application_rejected(
        freelancer_id: Uuid,
        project_id: Uuid,
        project_title: &str,
    ) -> Self {
        Self {
            id: format!("app_rejected_{project_id}_{freelancer_id}"),
            kind: NotificationKind::ApplicationRejected,
            title: "Application update".to_string(),
            message: format!("Your application for \"{project_title}\" was not selected this time"),
            data: serde_json::json!({
                "projectId": project_id,
                "projectTitle": project_title,
            }),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_shape_matches_the_event_contract() {
        let app_id = Uuid::new_v4();
        let project_id = Uuid::new_v4();
        let n = Notification::application_received(app_id, project_id, "Site Redesign", "maya");

        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "application_received");
        assert_eq!(json["id"], format!("app_received_{app_id}"));
        assert_eq!(json["data"]["projectTitle"], "Site Redesign");
        assert!(json["timestamp"].is_string());
        assert!(json["message"].as_str().unwrap().contains("maya"));
    }

    #[test]
    fn accept_and_reject_events_target_the_applicant() {
        let freelancer = Uuid::new_v4();
        let project = Uuid::new_v4();

        let accepted =
            Notification::application_accepted(freelancer, project, "Site Redesign", "Backend Developer");
        let json = serde_json::to_value(&accepted).unwrap();
        assert_eq!(json["type"], "application_accepted");
        assert_eq!(json["data"]["roleTitle"], "Backend Developer");

        let rejected = Notification::application_rejected(freelancer, project, "Site Redesign");
        let json = serde_json::to_value(&rejected).unwrap();
        assert_eq!(json["type"], "application_rejected");
        assert_eq!(json["id"], format!("app_rejected_{project}_{freelancer}"));
    }
}
