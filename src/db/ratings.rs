use sea_orm::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::ratings;
use crate::models::users::ReceivedRating;
use crate::models::{projects, users};

/// Insert a rating. The unique (rater, rated, project) index backs the
/// at-most-one-rating-per-pair invariant.
pub async fn insert_rating(
    db: &DatabaseConnection,
    rater_id: Uuid,
    rated_user_id: Uuid,
    project_id: Uuid,
    score: i32,
    comment: Option<String>,
) -> Result<ratings::Model, DbErr> {
    let new_rating = ratings::ActiveModel {
        id: Set(Uuid::new_v4()),
        rater_id: Set(rater_id),
        rated_user_id: Set(rated_user_id),
        project_id: Set(project_id),
        score: Set(score),
        comment: Set(comment),
        created_at: Set(chrono::Utc::now()),
    };

    new_rating.insert(db).await
}

/// The friendly-error pre-check before insert.
pub async fn find_by_triple(
    db: &DatabaseConnection,
    rater_id: Uuid,
    rated_user_id: Uuid,
    project_id: Uuid,
) -> Result<Option<ratings::Model>, DbErr> {
    ratings::Entity::find()
        .filter(ratings::Column::RaterId.eq(rater_id))
        .filter(ratings::Column::RatedUserId.eq(rated_user_id))
        .filter(ratings::Column::ProjectId.eq(project_id))
        .one(db)
        .await
}

/// Everything the caller has rated on one project, keyed by rated user —
/// lets the rateable-members listing annotate each row without per-member
/// existence checks.
pub async fn get_by_project_and_rater(
    db: &DatabaseConnection,
    project_id: Uuid,
    rater_id: Uuid,
) -> Result<HashMap<Uuid, ratings::Model>, DbErr> {
    let rows = ratings::Entity::find()
        .filter(ratings::Column::ProjectId.eq(project_id))
        .filter(ratings::Column::RaterId.eq(rater_id))
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|r| (r.rated_user_id, r)).collect())
}

/// Ratings received by a user, joined with rater usernames and project
/// titles for the public profile.
pub async fn get_received_ratings(
    db: &DatabaseConnection,
    rated_user_id: Uuid,
) -> Result<Vec<ReceivedRating>, DbErr> {
    let rows = ratings::Entity::find()
        .filter(ratings::Column::RatedUserId.eq(rated_user_id))
        .order_by_desc(ratings::Column::CreatedAt)
        .all(db)
        .await?;

    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let rater_ids: Vec<Uuid> = rows.iter().map(|r| r.rater_id).collect();
    let project_ids: Vec<Uuid> = rows.iter().map(|r| r.project_id).collect();

    let raters: HashMap<Uuid, String> = users::Entity::find()
        .filter(users::Column::Id.is_in(rater_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect();

    let titles: HashMap<Uuid, String> = projects::Entity::find()
        .filter(projects::Column::Id.is_in(project_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p.title))
        .collect();

    Ok(rows
        .into_iter()
        .map(|r| ReceivedRating {
            score: r.score,
            comment: r.comment,
            created_at: r.created_at,
            rater_username: raters.get(&r.rater_id).cloned().unwrap_or_default(),
            project_title: titles.get(&r.project_id).cloned().unwrap_or_default(),
        })
        .collect())
}
