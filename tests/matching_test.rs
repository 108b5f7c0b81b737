//! Integration test for the recommendation scorer.
//!
//! Exercises `score_project` and `rank_by_match` over a realistic catalogue
//! the way the recommendation handler does. No database is needed.
//!
//! Run with: `cargo test --test matching_test`
use std::collections::HashMap;
use uuid::Uuid;

use teamlink_backend::matching::{SkillRequirement, rank_by_match, score_project};
use teamlink_backend::models::user_skills::SkillLevel;

struct Catalogue {
    rust: Uuid,
    postgres: Uuid,
    docker: Uuid,
    react: Uuid,
}

impl Catalogue {
    fn new() -> Self {
        Self {
            rust: Uuid::new_v4(),
            postgres: Uuid::new_v4(),
            docker: Uuid::new_v4(),
            react: Uuid::new_v4(),
        }
    }
}

fn req(skill_id: Uuid, name: &str, level: SkillLevel) -> SkillRequirement {
    SkillRequirement {
        skill_id,
        skill_name: name.to_string(),
        required_level: level,
    }
}

#[test]
fn partial_match_scores_a_rounded_percentage() {
    let cat = Catalogue::new();

    // Holds two of the three required skills at sufficient levels.
    let held = HashMap::from([
        (cat.rust, SkillLevel::Expert),
        (cat.postgres, SkillLevel::Intermediate),
    ]);
    let requirements = vec![
        req(cat.rust, "Rust", SkillLevel::Intermediate),
        req(cat.postgres, "PostgreSQL", SkillLevel::Intermediate),
        req(cat.docker, "Docker", SkillLevel::Beginner),
    ];

    let score = score_project(&held, &requirements).expect("two matches should score");
    assert_eq!(score.matched_skills, 2);
    assert_eq!(score.total_required_skills, 3);
    // 2/3 → 66.67 → 67
    assert_eq!(score.match_percentage, 67);

    let docker = score
        .skill_matches
        .iter()
        .find(|m| m.skill_name == "Docker")
        .unwrap();
    assert!(!docker.is_match);
    assert_eq!(docker.user_level, None);
}

#[test]
fn insufficient_level_does_not_count_as_a_match() {
    let cat = Catalogue::new();

    let held = HashMap::from([
        (cat.rust, SkillLevel::Beginner),
        (cat.react, SkillLevel::Expert),
    ]);
    let requirements = vec![
        req(cat.rust, "Rust", SkillLevel::Expert),
        req(cat.react, "React", SkillLevel::Intermediate),
    ];

    let score = score_project(&held, &requirements).unwrap();
    assert_eq!(score.matched_skills, 1);
    assert_eq!(score.match_percentage, 50);

    let rust = score
        .skill_matches
        .iter()
        .find(|m| m.skill_name == "Rust")
        .unwrap();
    assert!(!rust.is_match);
    // The gap is visible: the caller's level is reported alongside the bar.
    assert_eq!(rust.user_level, Some(SkillLevel::Beginner));
    assert_eq!(rust.required_level, SkillLevel::Expert);
}

#[test]
fn unmatchable_and_requirementless_projects_are_excluded() {
    let cat = Catalogue::new();
    let held = HashMap::from([(cat.react, SkillLevel::Expert)]);

    // No overlap at all.
    let backend_only = vec![
        req(cat.rust, "Rust", SkillLevel::Beginner),
        req(cat.postgres, "PostgreSQL", SkillLevel::Beginner),
    ];
    assert!(score_project(&held, &backend_only).is_none());

    // No requirements declared.
    assert!(score_project(&held, &[]).is_none());
}

#[test]
fn candidates_rank_best_first_with_stable_ties() {
    let cat = Catalogue::new();
    let held = HashMap::from([
        (cat.rust, SkillLevel::Expert),
        (cat.docker, SkillLevel::Intermediate),
    ]);

    let full = score_project(&held, &[req(cat.rust, "Rust", SkillLevel::Expert)]).unwrap();
    let half = score_project(
        &held,
        &[
            req(cat.rust, "Rust", SkillLevel::Expert),
            req(cat.postgres, "PostgreSQL", SkillLevel::Beginner),
        ],
    )
    .unwrap();
    assert_eq!(full.match_percentage, 100);
    assert_eq!(half.match_percentage, 50);

    // Candidates arrive newest-first; ties must keep that order.
    let mut scored = vec![
        ("newer-half", half.clone()),
        ("full", full),
        ("older-half", half),
    ];
    rank_by_match(&mut scored);

    let order: Vec<&str> = scored.iter().map(|(name, _)| *name).collect();
    assert_eq!(order, vec!["full", "newer-half", "older-half"]);
}
