//! Skill-match scoring between a freelancer's held skills and a project's
//! required skills.
//!
//! Pure functions over plain data: the handlers load skills and candidate
//! projects, this module decides which projects are worth recommending and
//! how well they fit.

use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::user_skills::SkillLevel;

/// One required skill on a candidate project, joined with its name.
#[derive(Debug, Clone)]
pub struct SkillRequirement {
    pub skill_id: Uuid,
    pub skill_name: String,
    pub required_level: SkillLevel,
}

/// Per-skill match detail: shows the caller exactly which requirements they
/// satisfy and where the gap is.
#[derive(Debug, Clone, Serialize)]
pub struct SkillMatch {
    pub skill_name: String,
    pub required_level: SkillLevel,
    /// The caller's level for this skill, absent when they don't hold it.
    pub user_level: Option<SkillLevel>,
    pub is_match: bool,
}

/// Aggregate match result for one project.
#[derive(Debug, Clone, Serialize)]
pub struct MatchScore {
    pub skill_matches: Vec<SkillMatch>,
    pub matched_skills: usize,
    pub total_required_skills: usize,
    /// round(matched / total × 100)
    pub match_percentage: u32,
}

/// Score one project against the caller's held skills.
///
/// Returns `None` when the project has no required skills or when not a
/// single requirement is satisfied — such projects are excluded from the
/// recommendation list entirely rather than scored zero.
pub fn score_project(
    held: &HashMap<Uuid, SkillLevel>,
    requirements: &[SkillRequirement],
) -> Option<MatchScore> {
    if requirements.is_empty() {
        return None;
    }

    let skill_matches: Vec<SkillMatch> = requirements
        .iter()
        .map(|req| {
            let user_level = held.get(&req.skill_id).copied();
            let is_match = user_level
                .map(|level| level.satisfies(req.required_level))
                .unwrap_or(false);
            SkillMatch {
                skill_name: req.skill_name.clone(),
                required_level: req.required_level,
                user_level,
                is_match,
            }
        })
        .collect();

    let matched_skills = skill_matches.iter().filter(|m| m.is_match).count();
    if matched_skills == 0 {
        return None;
    }

    let total_required_skills = requirements.len();
    let match_percentage =
        ((matched_skills as f64 / total_required_skills as f64) * 100.0).round() as u32;

    Some(MatchScore {
        skill_matches,
        matched_skills,
        total_required_skills,
        match_percentage,
    })
}

/// Sort scored candidates by match percentage, best first.
///
/// The sort is stable, so candidates with equal percentages keep the order
/// they were supplied in (the handlers fetch candidates newest-first).
pub fn rank_by_match<T>(scored: &mut [(T, MatchScore)]) {
    scored.sort_by(|a, b| b.1.match_percentage.cmp(&a.1.match_percentage));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user_skills::SkillLevel::*;

    fn req(id: Uuid, name: &str, level: SkillLevel) -> SkillRequirement {
        SkillRequirement {
            skill_id: id,
            skill_name: name.to_string(),
            required_level: level,
        }
    }

    #[test]
    fn no_requirements_is_never_recommended() {
        let held = HashMap::from([(Uuid::new_v4(), Expert)]);
        assert!(score_project(&held, &[]).is_none());
    }

    #[test]
    fn zero_matches_is_filtered_out_not_scored_zero() {
        // Project requires intermediate, the freelancer only has beginner.
        let skill = Uuid::new_v4();
        let held = HashMap::from([(skill, Beginner)]);
        let reqs = vec![req(skill, "SkillX", Intermediate)];
        assert!(score_project(&held, &reqs).is_none());
    }

    #[test]
    fn higher_level_satisfies_lower_requirement() {
        let skill = Uuid::new_v4();
        let held = HashMap::from([(skill, Expert)]);
        for required in [Beginner, Intermediate, Expert] {
            let score = score_project(&held, &[req(skill, "X", required)]).unwrap();
            assert_eq!(score.matched_skills, 1);
            assert_eq!(score.match_percentage, 100);
        }
    }

    #[test]
    fn percentage_rounds_to_nearest_integer() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let held = HashMap::from([(a, Expert)]);
        let reqs = vec![
            req(a, "A", Beginner),
            req(b, "B", Beginner),
            req(c, "C", Beginner),
        ];
        // 1 of 3 → 33.33 → 33
        let score = score_project(&held, &reqs).unwrap();
        assert_eq!(score.match_percentage, 33);

        let held2 = HashMap::from([(a, Expert), (b, Expert)]);
        // 2 of 3 → 66.67 → 67
        let score2 = score_project(&held2, &reqs).unwrap();
        assert_eq!(score2.match_percentage, 67);
    }

    #[test]
    fn per_skill_detail_names_the_gap() {
        let (have, miss) = (Uuid::new_v4(), Uuid::new_v4());
        let held = HashMap::from([(have, Intermediate)]);
        let reqs = vec![req(have, "Rust", Beginner), req(miss, "Kubernetes", Expert)];

        let score = score_project(&held, &reqs).unwrap();
        assert_eq!(score.skill_matches.len(), 2);

        let rust = &score.skill_matches[0];
        assert!(rust.is_match);
        assert_eq!(rust.user_level, Some(Intermediate));

        let k8s = &score.skill_matches[1];
        assert!(!k8s.is_match);
        assert_eq!(k8s.user_level, None);
        assert_eq!(k8s.skill_name, "Kubernetes");
    }

    #[test]
    fn adding_skills_never_lowers_the_percentage() {
        // Monotonicity: S2 ⊇ S1 scores at least as high for any project.
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let reqs = vec![
            req(a, "A", Intermediate),
            req(b, "B", Beginner),
            req(c, "C", Expert),
        ];

        let s1 = HashMap::from([(a, Intermediate)]);
        let mut s2 = s1.clone();
        s2.insert(b, Beginner);
        s2.insert(c, Expert);

        let p1 = score_project(&s1, &reqs).unwrap().match_percentage;
        let p2 = score_project(&s2, &reqs).unwrap().match_percentage;
        assert!(p2 >= p1);
        assert_eq!(p2, 100);
    }

    #[test]
    fn ranking_is_descending_and_stable_on_ties() {
        let skill = Uuid::new_v4();
        let held = HashMap::from([(skill, Expert)]);

        let full = score_project(&held, &[req(skill, "X", Beginner)]).unwrap();
        let partial = score_project(
            &held,
            &[req(skill, "X", Beginner), req(Uuid::new_v4(), "Y", Beginner)],
        )
        .unwrap();

        let mut scored = vec![
            ("half-first", partial.clone()),
            ("full-a", full.clone()),
            ("half-second", partial),
            ("full-b", full),
        ];
        rank_by_match(&mut scored);

        let order: Vec<&str> = scored.iter().map(|(name, _)| *name).collect();
        assert_eq!(order, vec!["full-a", "full-b", "half-first", "half-second"]);
    }
}
