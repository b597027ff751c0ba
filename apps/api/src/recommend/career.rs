//! Career planner: compares detected skills against a target role.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::recommend::taxonomy::{role_requirements, TARGET_JOB_SKILLS};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SkillTier {
    Core,
    Secondary,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SkillStatus {
    Have,
    Missing,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SkillComparison {
    pub skill: String,
    pub tier: SkillTier,
    pub status: SkillStatus,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CareerComparison {
    pub role: String,
    pub core_match_percent: u32,
    pub skills: Vec<SkillComparison>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleSummary {
    pub role: &'static str,
    pub core: &'static [&'static str],
    pub secondary: &'static [&'static str],
}

pub fn target_roles() -> Vec<RoleSummary> {
    TARGET_JOB_SKILLS
        .iter()
        .map(|r| RoleSummary {
            role: r.role,
            core: r.core,
            secondary: r.secondary,
        })
        .collect()
}

/// `None` for a role outside the table.
pub fn compare_to_role(role: &str, user_skills: &BTreeSet<String>) -> Option<CareerComparison> {
    let requirements = role_requirements(role)?;

    let status = |skill: &str| {
        if user_skills.contains(skill) {
            SkillStatus::Have
        } else {
            SkillStatus::Missing
        }
    };

    let matched_core = requirements
        .core
        .iter()
        .filter(|s| user_skills.contains(**s))
        .count();
    let core_match_percent = if requirements.core.is_empty() {
        0
    } else {
        (matched_core * 100 / requirements.core.len()) as u32
    };

    let skills = requirements
        .core
        .iter()
        .map(|s| (s, SkillTier::Core))
        .chain(requirements.secondary.iter().map(|s| (s, SkillTier::Secondary)))
        .map(|(skill, tier)| SkillComparison {
            skill: skill.to_string(),
            tier,
            status: status(*skill),
        })
        .collect();

    Some(CareerComparison {
        role: requirements.role.to_string(),
        core_match_percent,
        skills,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_match_percent_is_floored() {
        let cmp = compare_to_role("Data Scientist", &skills(&["Python", "SQL"])).unwrap();
        // 2 of 7 core skills.
        assert_eq!(cmp.core_match_percent, 28);
    }

    #[test]
    fn test_statuses_cover_core_then_secondary() {
        let cmp = compare_to_role("Data Analyst", &skills(&["SQL", "Excel"])).unwrap();
        assert_eq!(cmp.skills.len(), 8);
        assert_eq!(cmp.skills[0].skill, "SQL");
        assert_eq!(cmp.skills[0].status, SkillStatus::Have);
        assert_eq!(cmp.skills[1].status, SkillStatus::Missing);
        let excel = cmp.skills.iter().find(|s| s.skill == "Excel").unwrap();
        assert_eq!(excel.tier, SkillTier::Secondary);
        assert_eq!(excel.status, SkillStatus::Have);
        assert_eq!(cmp.core_match_percent, 20);
    }

    #[test]
    fn test_unknown_role() {
        assert!(compare_to_role("Astronaut", &skills(&[])).is_none());
    }

    #[test]
    fn test_roles_are_listed_in_table_order() {
        let roles: Vec<&str> = target_roles().iter().map(|r| r.role).collect();
        assert_eq!(
            roles,
            vec![
                "Data Analyst",
                "Data Scientist",
                "Machine Learning Engineer",
                "Data Engineer"
            ]
        );
    }

    #[test]
    fn test_comparison_serializes_lowercase_enums() {
        let cmp = compare_to_role("Data Engineer", &skills(&["Kafka"])).unwrap();
        let json = serde_json::to_value(&cmp).unwrap();
        assert_eq!(json["skills"][3]["status"], "have");
        assert_eq!(json["skills"][3]["tier"], "core");
    }
}
