//! End-to-end portfolio analysis: skills → ranking → clusters → score →
//! recommendations → summary → overview.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::analysis::clustering::cluster_projects;
use crate::analysis::kmeans::KMeansError;
use crate::analysis::overview::{build_overview, rank_by_relevance, PortfolioOverview};
use crate::analysis::projection::{ProjectionError, Projector};
use crate::analysis::scoring::{score_portfolio, ScoreReport};
use crate::analysis::skills::extract_skills;
use crate::embedding::{Embedder, EmbeddingError};
use crate::models::project::{ProjectRecord, RepoSkills, SkillTable};
use crate::recommend::gaps::{generate_recommendations, RecommendationSet};
use crate::summarizer::Summarizer;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Embedding service unavailable: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Clustering failed: {0}")]
    Clustering(#[from] KMeansError),

    #[error("Projection failed: {0}")]
    Projection(#[from] ProjectionError),
}

/// Model-backed collaborators of one analysis run.
#[derive(Clone, Copy)]
pub struct AnalysisServices<'a> {
    pub embedder: &'a dyn Embedder,
    pub projector: &'a dyn Projector,
    pub summarizer: &'a Summarizer,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClusterSummary {
    pub cluster_id: usize,
    pub label: String,
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioAnalysis {
    pub analysis_id: Uuid,
    pub username: String,
    pub generated_at: DateTime<Utc>,
    /// Sorted by relevance, highest first.
    pub projects: Vec<ProjectRecord>,
    pub skills: SkillTable,
    pub repo_skills: RepoSkills,
    pub scores: ScoreReport,
    pub recommendations: RecommendationSet,
    pub project_ideas_text: String,
    pub summary: String,
    pub overview: PortfolioOverview,
    pub clusters: Vec<ClusterSummary>,
}

pub async fn analyze_portfolio(
    username: &str,
    mut projects: Vec<ProjectRecord>,
    services: AnalysisServices<'_>,
    today: NaiveDate,
) -> Result<PortfolioAnalysis, PipelineError> {
    let extraction = extract_skills(&projects);
    for project in projects.iter_mut() {
        project.skills = extraction.repo_skills.get(&project.name).cloned();
    }
    rank_by_relevance(&mut projects, &extraction.repo_skills);

    let projects = cluster_projects(projects, services.embedder, services.projector).await?;
    let scores = score_portfolio(&projects, &extraction.skill_counts);
    let recommendations = generate_recommendations(&extraction.skill_counts);

    let combined_readmes = projects
        .iter()
        .map(|p| p.readme_content.as_str())
        .filter(|r| !r.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let summary = services.summarizer.summarize(&combined_readmes).await;

    let overview = build_overview(&projects, today);
    let clusters = summarize_clusters(&projects);

    info!(
        username,
        projects = projects.len(),
        skills = extraction.skill_counts.len(),
        clusters = clusters.len(),
        total_score = scores.total_score,
        "Portfolio analysis complete"
    );

    Ok(PortfolioAnalysis {
        analysis_id: Uuid::new_v4(),
        username: username.to_string(),
        generated_at: Utc::now(),
        project_ideas_text: recommendations.project_ideas_text(),
        projects,
        skills: extraction.skill_counts,
        repo_skills: extraction.repo_skills,
        scores,
        recommendations,
        summary,
        overview,
        clusters,
    })
}

fn summarize_clusters(projects: &[ProjectRecord]) -> Vec<ClusterSummary> {
    let mut by_id: BTreeMap<usize, ClusterSummary> = BTreeMap::new();
    for project in projects {
        if let Some(cluster) = &project.cluster {
            by_id
                .entry(cluster.cluster_id)
                .or_insert_with(|| ClusterSummary {
                    cluster_id: cluster.cluster_id,
                    label: cluster.cluster_label.clone(),
                    projects: Vec::new(),
                })
                .projects
                .push(project.name.clone());
        }
    }
    by_id.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use crate::analysis::projection::StressLayout;
    use crate::summarizer::NOT_ENOUGH_CONTENT;
    use crate::test_support::{EchoGenerator, FailingEmbedder, KeywordEmbedder};

    fn fixture() -> Vec<ProjectRecord> {
        vec![
            ProjectRecord::new("sales-dash", "sales dashboard in sql")
                .with_readme("SQL and Pandas")
                .with_language("Python"),
            ProjectRecord::new("text-bot", "text classifier with pytorch")
                .with_readme("NLP with spaCy")
                .with_stars(2)
                .with_language("Python"),
            ProjectRecord::new("vision-net", "image classifier with pytorch")
                .with_readme("PyTorch CNN for images using Docker")
                .with_stars(10)
                .with_language("Jupyter Notebook"),
        ]
    }

    fn embedder_for(projects: &[ProjectRecord]) -> KeywordEmbedder {
        let vocabulary: BTreeSet<String> = projects
            .iter()
            .flat_map(|p| p.description.split_whitespace().map(str::to_string))
            .collect();
        let words: Vec<&str> = vocabulary.iter().map(String::as_str).collect();
        KeywordEmbedder::new(&words)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    async fn run(projects: Vec<ProjectRecord>) -> PortfolioAnalysis {
        let embedder = embedder_for(&projects);
        let summarizer = Summarizer::new(Some(Arc::new(EchoGenerator)));
        let services = AnalysisServices {
            embedder: &embedder,
            projector: &StressLayout::default(),
            summarizer: &summarizer,
        };
        analyze_portfolio("octo", projects, services, today())
            .await
            .unwrap()
    }

    fn dist(p: &ProjectRecord, q: &ProjectRecord) -> f64 {
        let a = p.cluster.as_ref().unwrap();
        let b = q.cluster.as_ref().unwrap();
        ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
    }

    #[tokio::test]
    async fn test_end_to_end_three_projects() {
        let analysis = run(fixture()).await;

        let names: Vec<&str> = analysis.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["vision-net", "text-bot", "sales-dash"]);

        assert_eq!(analysis.skills.get("PyTorch"), Some(&2));
        assert_eq!(analysis.skills.get("SQL"), Some(&1));
        assert_eq!(analysis.skills.get("Docker"), Some(&1));
        assert!(analysis.repo_skills["text-bot"].contains("spaCy"));

        // Three samples resolve to a single cluster.
        assert!(analysis
            .projects
            .iter()
            .all(|p| p.cluster.as_ref().map(|c| c.cluster_id) == Some(0)));
        assert_eq!(analysis.clusters.len(), 1);
        assert_eq!(analysis.scores.breakdown.domain_diversity, 20.0);

        let (vision, text, sales) = (
            &analysis.projects[0],
            &analysis.projects[1],
            &analysis.projects[2],
        );
        assert!(dist(vision, text) < dist(vision, sales));

        assert_eq!(analysis.recommendations.skills_to_learn, vec!["Spark"]);
        assert_eq!(
            analysis.project_ideas_text,
            "- Create a data pipeline to process real-time streaming data with Spark."
        );
        assert_eq!(
            analysis.summary,
            "PyTorch CNN for images using Docker NLP with spaCy SQL and Pandas"
        );
        assert_eq!(analysis.overview.primary_language, "Python");
        assert_eq!(analysis.overview.showcase.len(), 3);
        assert!(analysis.scores.total_score <= 100);
    }

    #[tokio::test]
    async fn test_dashboard_and_deep_learning_portfolio() {
        let projects = vec![
            ProjectRecord::new("dashboard", "sales dashboard with pandas and plotly").with_stars(10),
            ProjectRecord::new("torch-model", "deep learning model with pytorch").with_stars(50),
            ProjectRecord::new("tf-model", "deep learning model with tensorflow").with_stars(5),
        ];
        let analysis = run(projects).await;

        for skill in ["Pandas", "Plotly", "PyTorch", "TensorFlow"] {
            assert_eq!(analysis.skills.get(skill), Some(&1), "{skill}");
        }
        let expected_popularity = 100.0 * 66f64.ln() / 101f64.ln();
        assert!((analysis.scores.breakdown.popularity - expected_popularity).abs() < 1e-9);

        let by_name = |name: &str| {
            analysis
                .projects
                .iter()
                .find(|p| p.name == name)
                .unwrap()
        };
        let (dashboard, torch, tf) = (by_name("dashboard"), by_name("torch-model"), by_name("tf-model"));
        assert!(dist(torch, tf) < dist(torch, dashboard));
        assert!(dist(torch, tf) < dist(tf, dashboard));
    }

    #[tokio::test]
    async fn test_repeated_runs_agree() {
        let first = run(fixture()).await;
        let second = run(fixture()).await;
        assert_eq!(first.skills, second.skills);
        assert_eq!(first.scores, second.scores);
        let ids = |a: &PortfolioAnalysis| {
            a.projects
                .iter()
                .map(|p| p.cluster.as_ref().map(|c| c.cluster_id))
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
        assert_ne!(first.analysis_id, second.analysis_id);
    }

    #[tokio::test]
    async fn test_empty_portfolio() {
        let analysis = run(Vec::new()).await;
        assert_eq!(analysis.scores.total_score, 0);
        assert!(analysis.clusters.is_empty());
        assert_eq!(analysis.summary, NOT_ENOUGH_CONTENT);
        assert_eq!(analysis.overview.total_repositories, 0);
        assert_eq!(analysis.recommendations.skills_to_learn.len(), 3);
    }

    #[tokio::test]
    async fn test_embedding_outage_fails_the_run() {
        let summarizer = Summarizer::new(None);
        let services = AnalysisServices {
            embedder: &FailingEmbedder,
            projector: &StressLayout::default(),
            summarizer: &summarizer,
        };
        let err = analyze_portfolio("octo", fixture(), services, today())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Embedding(_)));
    }

    #[test]
    fn test_cluster_summaries_group_by_id() {
        use crate::models::project::ClusterAssignment;
        let assign = |name: &str, id: usize| {
            let mut p = ProjectRecord::new(name, "d");
            p.cluster = Some(ClusterAssignment {
                cluster_id: id,
                cluster_label: format!("L{id}"),
                x: 0.0,
                y: 0.0,
            });
            p
        };
        let projects = vec![assign("a", 1), assign("b", 0), assign("c", 1)];
        let summaries = summarize_clusters(&projects);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].projects, vec!["b"]);
        assert_eq!(summaries[1].projects, vec!["a", "c"]);
        assert_eq!(summaries[1].label, "L1");
    }
}
