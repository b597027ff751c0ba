//! Skill-gap recommendations over the core-domain taxonomy.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::project::SkillTable;
use crate::recommend::taxonomy::{course_for, project_idea, CORE_SKILLS};

const MAX_SKILLS_TO_LEARN: usize = 3;
const MAX_PROJECT_IDEAS: usize = 3;

pub const WELL_ALIGNED_MESSAGE: &str =
    "Your portfolio covers a wide range of domains! Consider specializing further in an area you enjoy.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillGap {
    pub domain: &'static str,
    pub representative: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseSuggestion {
    pub skill: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendationSet {
    pub skills_to_learn: Vec<String>,
    pub project_ideas: Vec<String>,
    pub suggested_courses: Vec<CourseSuggestion>,
    #[serde(default)]
    pub well_aligned: bool,
}

impl RecommendationSet {
    /// Ideas as a `- ` bullet list, or the well-aligned message when there are none.
    pub fn project_ideas_text(&self) -> String {
        if self.project_ideas.is_empty() {
            return WELL_ALIGNED_MESSAGE.to_string();
        }
        self.project_ideas
            .iter()
            .map(|idea| format!("- {idea}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Domains with none of their skills detected, in taxonomy order.
pub fn skill_gaps(skills: &SkillTable) -> Vec<SkillGap> {
    CORE_SKILLS
        .iter()
        .filter(|(_, domain_skills)| {
            !domain_skills
                .iter()
                .any(|s| skills.get(*s).is_some_and(|&count| count > 0))
        })
        .filter_map(|(domain, domain_skills)| {
            domain_skills.first().map(|first| SkillGap {
                domain: *domain,
                representative: *first,
            })
        })
        .collect()
}

/// Recommendations with ideas shuffled by the thread RNG.
pub fn generate_recommendations(skills: &SkillTable) -> RecommendationSet {
    generate_recommendations_with(skills, &mut rand::thread_rng())
}

pub fn generate_recommendations_with<R: Rng + ?Sized>(
    skills: &SkillTable,
    rng: &mut R,
) -> RecommendationSet {
    let gaps = skill_gaps(skills);

    let mut project_ideas: Vec<String> = gaps
        .iter()
        .filter_map(|g| project_idea(g.domain))
        .map(str::to_string)
        .collect();
    project_ideas.shuffle(rng);
    project_ideas.truncate(MAX_PROJECT_IDEAS);

    let suggested_courses = gaps
        .iter()
        .filter_map(|g| {
            course_for(g.representative).map(|url| CourseSuggestion {
                skill: g.representative.to_string(),
                url: url.to_string(),
            })
        })
        .collect();

    RecommendationSet {
        skills_to_learn: gaps
            .iter()
            .take(MAX_SKILLS_TO_LEARN)
            .map(|g| g.representative.to_string())
            .collect(),
        project_ideas,
        suggested_courses,
        well_aligned: gaps.is_empty(),
    }
}
