use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Language tag used when the hosting service reports none.
pub const UNSPECIFIED_LANGUAGE: &str = "Not specified";

/// Skill name → number of distinct projects mentioning it.
pub type SkillTable = BTreeMap<String, u32>;

/// Project name → skills detected in that project.
pub type RepoSkills = BTreeMap<String, BTreeSet<String>>;

/// One repository, as fetched and then enriched by the analysis stages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub readme_content: String,
    #[serde(default = "default_language")]
    pub primary_language: String,
    #[serde(default)]
    pub star_count: u32,
    #[serde(default)]
    pub commits: Vec<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<BTreeSet<String>>,
    /// Present only for projects that took part in clustering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<ClusterAssignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
}

fn default_language() -> String {
    UNSPECIFIED_LANGUAGE.to_string()
}

impl ProjectRecord {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            readme_content: String::new(),
            primary_language: default_language(),
            star_count: 0,
            commits: Vec::new(),
            skills: None,
            cluster: None,
            relevance_score: None,
        }
    }

    pub fn with_readme(mut self, readme: impl Into<String>) -> Self {
        self.readme_content = readme.into();
        self
    }

    pub fn with_stars(mut self, stars: u32) -> Self {
        self.star_count = stars;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.primary_language = language.into();
        self
    }

    /// Whether the description carries anything to embed.
    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }

    pub fn readme_len(&self) -> usize {
        self.readme_content.chars().count()
    }
}

/// Cluster membership and scatter-plot position of a clustered project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusterAssignment {
    pub cluster_id: usize,
    pub cluster_label: String,
    pub x: f64,
    pub y: f64,
}
