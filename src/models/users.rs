use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `users` table.
///
/// This is a shadow of the Keycloak identity: created lazily on the first
/// authenticated request and keyed by `keycloak_id`. Role deliberately has no
/// column here — it is derived from token claims on every request.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub keycloak_id: Uuid,
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub last_login_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_skills::Entity")]
    UserSkills,
    #[sea_orm(has_many = "super::projects::Entity")]
    OwnedProjects,
    #[sea_orm(has_many = "super::applications::Entity")]
    Applications,
    #[sea_orm(has_many = "super::teams::Entity")]
    TeamMemberships,
}

impl Related<super::user_skills::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserSkills.def()
    }
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OwnedProjects.def()
    }
}

impl Related<super::applications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applications.def()
    }
}

impl Related<super::teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamMemberships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Caller-updatable profile fields.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfile {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// The short user shape embedded in project/application/team responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

impl From<Model> for UserSummary {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            email: m.email,
            avatar_url: m.avatar_url,
            bio: m.bio,
        }
    }
}

/// A rating as shown on a public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceivedRating {
    pub score: i32,
    pub comment: Option<String>,
    pub created_at: DateTimeUtc,
    pub rater_username: String,
    pub project_title: String,
}

/// Public profile: skills plus the rating aggregate. Deserialize as well as
/// Serialize — the profile handler reads this shape back out of the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTimeUtc,
    pub skills: Vec<super::user_skills::SkillWithLevel>,
    pub ratings: Vec<ReceivedRating>,
    /// Mean of received scores rounded to 2 decimal places, 0 when unrated.
    pub average_rating: f64,
    pub total_ratings: usize,
}

/// Round to 2 decimal places for the profile aggregate.
pub fn round_average(sum: i64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let mean = sum as f64 / count as f64;
    (mean * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_rounds_to_two_decimals() {
        // 5 + 4 + 4 = 13 over 3 → 4.333... → 4.33
        assert_eq!(round_average(13, 3), 4.33);
        // 5 + 4 = 9 over 2 → 4.5
        assert_eq!(round_average(9, 2), 4.5);
    }

    #[test]
    fn no_ratings_averages_to_zero() {
        assert_eq!(round_average(0, 0), 0.0);
    }

    #[test]
    fn cached_profile_shape_reads_back_out() {
        // The profile handler stores this shape in Redis and later
        // deserializes it on a cache hit, so both directions must work.
        let profile = UserProfile {
            id: Uuid::new_v4(),
            username: "maya".to_string(),
            email: "maya@example.com".to_string(),
            bio: None,
            avatar_url: None,
            created_at: chrono::Utc::now(),
            skills: vec![super::super::user_skills::SkillWithLevel {
                id: Uuid::new_v4(),
                name: "Rust".to_string(),
                level: super::super::user_skills::SkillLevel::Expert,
            }],
            ratings: vec![ReceivedRating {
                score: 5,
                comment: Some("Great work".to_string()),
                created_at: chrono::Utc::now(),
                rater_username: "lee".to_string(),
                project_title: "Site Redesign".to_string(),
            }],
            average_rating: 5.0,
            total_ratings: 1,
        };

        let json = serde_json::to_string(&profile).unwrap();
        let restored: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.id, profile.id);
        assert_eq!(restored.skills[0].name, "Rust");
        assert_eq!(restored.ratings[0].score, 5);
        assert_eq!(restored.average_rating, 5.0);
    }
}
