//! Portfolio Scorer — four normalised sub-scores combined into one 0–100 grade.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::project::{ProjectRecord, SkillTable};

pub const TARGET_UNIQUE_SKILLS: f64 = 20.0;
pub const TARGET_CLUSTERS: f64 = 5.0;
pub const TARGET_TOTAL_STARS: f64 = 100.0;
pub const TARGET_AVG_README_CHARS: f64 = 1500.0;

/// Sub-score weights. Must sum to 1.0.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub tech_diversity: f64,
    pub domain_diversity: f64,
    pub popularity: f64,
    pub readme_quality: f64,
}

pub const WEIGHTS: ScoreWeights = ScoreWeights {
    tech_diversity: 0.30,
    domain_diversity: 0.30,
    popularity: 0.25,
    readme_quality: 0.15,
};

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.tech_diversity + self.domain_diversity + self.popularity + self.readme_quality
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ScoreBreakdown {
    pub tech_diversity: f64,
    pub domain_diversity: f64,
    pub popularity: f64,
    pub readme_quality: f64,
}

impl ScoreBreakdown {
    /// Floor of the weighted sum.
    pub fn aggregate(&self) -> u32 {
        debug_assert!((WEIGHTS.sum() - 1.0).abs() < 1e-9);
        let weighted = self.tech_diversity * WEIGHTS.tech_diversity
            + self.domain_diversity * WEIGHTS.domain_diversity
            + self.popularity * WEIGHTS.popularity
            + self.readme_quality * WEIGHTS.readme_quality;
        weighted.clamp(0.0, 100.0).floor() as u32
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ScoreReport {
    pub total_score: u32,
    pub breakdown: ScoreBreakdown,
}

/// `min(100, 100·value/target)`; a zero target scores 0.
pub fn normalize(value: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (100.0 * value / target).clamp(0.0, 100.0)
}

/// Log-scaled variant for heavy-tailed values such as star counts.
pub fn normalize_log(value: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (100.0 * (value.max(0.0) + 1.0).ln() / (target + 1.0).ln()).clamp(0.0, 100.0)
}

pub fn score_portfolio(projects: &[ProjectRecord], skills: &SkillTable) -> ScoreReport {
    if projects.is_empty() {
        return ScoreReport::default();
    }

    let unique_skills = skills.values().filter(|&&count| count > 0).count();
    let clusters: BTreeSet<usize> = projects
        .iter()
        .filter_map(|p| p.cluster.as_ref().map(|c| c.cluster_id))
        .collect();
    let total_stars: u64 = projects.iter().map(|p| p.star_count as u64).sum();
    let avg_readme =
        projects.iter().map(|p| p.readme_len()).sum::<usize>() as f64 / projects.len() as f64;

    let breakdown = ScoreBreakdown {
        tech_diversity: normalize(unique_skills as f64, TARGET_UNIQUE_SKILLS),
        domain_diversity: normalize(clusters.len() as f64, TARGET_CLUSTERS),
        popularity: normalize_log(total_stars as f64, TARGET_TOTAL_STARS),
        readme_quality: normalize(avg_readme, TARGET_AVG_README_CHARS),
    };

    ScoreReport {
        total_score: breakdown.aggregate(),
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::ClusterAssignment;

    fn clustered(name: &str, cluster_id: usize) -> ProjectRecord {
        let mut p = ProjectRecord::new(name, "desc");
        p.cluster = Some(ClusterAssignment {
            cluster_id,
            cluster_label: format!("Cluster {cluster_id}"),
            x: 0.0,
            y: 0.0,
        });
        p
    }

    #[test]
    fn test_weights_sum_to_one() {
        assert!((WEIGHTS.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_bounds() {
        assert_eq!(normalize(5.0, 0.0), 0.0);
        assert_eq!(normalize(10.0, 20.0), 50.0);
        assert_eq!(normalize(40.0, 20.0), 100.0);
        assert_eq!(normalize_log(0.0, 100.0), 0.0);
        assert!((normalize_log(100.0, 100.0) - 100.0).abs() < 1e-9);
        assert_eq!(normalize_log(5000.0, 100.0), 100.0);
        assert_eq!(normalize_log(3.0, 0.0), 0.0);
    }

    #[test]
    fn test_normalize_log_is_monotone() {
        let mut last = -1.0;
        for stars in [0.0, 1.0, 5.0, 20.0, 99.0, 100.0, 1000.0] {
            let s = normalize_log(stars, 100.0);
            assert!(s >= last);
            last = s;
        }
    }

    #[test]
    fn test_empty_portfolio_scores_zero() {
        let report = score_portfolio(&[], &SkillTable::new());
        assert_eq!(report.total_score, 0);
        assert_eq!(report.breakdown, ScoreBreakdown::default());
    }

    #[test]
    fn test_domain_diversity_counts_distinct_cluster_ids() {
        let projects = vec![clustered("a", 0), clustered("b", 1), clustered("c", 1)];
        let report = score_portfolio(&projects, &SkillTable::new());
        assert_eq!(report.breakdown.domain_diversity, 40.0);
    }

    #[test]
    fn test_unclustered_projects_add_no_domains() {
        let projects = vec![ProjectRecord::new("a", "")];
        let report = score_portfolio(&projects, &SkillTable::new());
        assert_eq!(report.breakdown.domain_diversity, 0.0);
    }

    #[test]
    fn test_full_marks() {
        let projects: Vec<ProjectRecord> = (0..5)
            .map(|i| {
                let mut p = clustered(&format!("p{i}"), i);
                p.star_count = 30;
                p.readme_content = "x".repeat(1500);
                p
            })
            .collect();
        let skills: SkillTable = (0..20).map(|i| (format!("skill{i}"), 1)).collect();
        let report = score_portfolio(&projects, &skills);
        assert_eq!(report.total_score, 100);
    }

    #[test]
    fn test_aggregate_floors_weighted_sum() {
        let breakdown = ScoreBreakdown {
            tech_diversity: 50.0,
            domain_diversity: 33.0,
            popularity: 10.0,
            readme_quality: 7.0,
        };
        // 15 + 9.9 + 2.5 + 1.05 = 28.45
        assert_eq!(breakdown.aggregate(), 28);
    }

    #[test]
    fn test_aggregate_is_monotone_in_each_component() {
        let base = ScoreBreakdown {
            tech_diversity: 40.0,
            domain_diversity: 40.0,
            popularity: 40.0,
            readme_quality: 40.0,
        };
        let bumps = [
            ScoreBreakdown { tech_diversity: 90.0, ..base },
            ScoreBreakdown { domain_diversity: 90.0, ..base },
            ScoreBreakdown { popularity: 90.0, ..base },
            ScoreBreakdown { readme_quality: 90.0, ..base },
        ];
        for bumped in bumps {
            assert!(bumped.aggregate() >= base.aggregate());
        }
    }

    #[test]
    fn test_readme_average_uses_characters() {
        let projects = vec![
            ProjectRecord::new("a", "").with_readme("é".repeat(750)),
            ProjectRecord::new("b", "").with_readme(""),
        ];
        let report = score_portfolio(&projects, &SkillTable::new());
        assert_eq!(report.breakdown.readme_quality, 25.0);
    }
}
