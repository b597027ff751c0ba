//! Clustering Engine — groups described projects by semantic similarity.
//!
//! Descriptions are embedded, the cluster count is chosen with the elbow rule,
//! k-means assigns ids, the projector lays the embeddings out in 2D, and each
//! cluster is labelled with its two most frequent non-stopword tokens.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::analysis::kmeans::{self, KMeansError};
use crate::analysis::pipeline::PipelineError;
use crate::analysis::projection::Projector;
use crate::embedding::{Embedder, EmbeddingError};
use crate::models::project::{ClusterAssignment, ProjectRecord};

pub const CLUSTER_SEED: u64 = 42;
const MAX_CLUSTERS: usize = 10;
const MAX_NEIGHBORS: usize = 15;
const LABEL_KEYWORDS: usize = 2;

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "in", "to", "for", "of", "and", "is", "with", "on", "using", "by",
];

/// Elbow rule: fit k = 1..=max_k and return the k after the largest inertia drop.
pub fn optimal_k(embeddings: &[Vec<f32>]) -> Result<usize, KMeansError> {
    let n = embeddings.len();
    if n < 2 {
        return Ok(1);
    }
    let max_k = MAX_CLUSTERS.min((n / 3).max(1)).min(n - 1);
    if max_k < 2 {
        return Ok(1);
    }

    let inertias = (1..=max_k)
        .map(|k| kmeans::fit(embeddings, k, CLUSTER_SEED).map(|f| f.inertia))
        .collect::<Result<Vec<_>, _>>()?;

    let mut best = 0;
    let mut best_drop = f64::NEG_INFINITY;
    for (i, pair) in inertias.windows(2).enumerate() {
        let drop = pair[0] - pair[1];
        if drop > best_drop {
            best_drop = drop;
            best = i;
        }
    }
    debug!(?inertias, k = best + 2, "Elbow selection");
    Ok(best + 2)
}

/// Most frequent tokens, ties broken by first occurrence.
pub fn top_keywords(text: &str, n: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, word) in lowered.split_whitespace().enumerate() {
        if !word.chars().all(char::is_alphanumeric) || STOPWORDS.contains(&word) {
            continue;
        }
        counts.entry(word).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .take(n)
        .map(|(word, _, _)| word.to_string())
        .collect()
}

/// Label for one cluster from its members' `(name, description)` pairs.
pub fn cluster_label<'a, I>(cluster_id: usize, members: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let text = members
        .into_iter()
        .map(|(name, description)| format!("{name} {description}"))
        .collect::<Vec<_>>()
        .join(" ");
    let keywords = top_keywords(&text, LABEL_KEYWORDS);
    if keywords.is_empty() {
        return format!("Cluster {cluster_id}");
    }
    keywords
        .iter()
        .map(|w| title_case(w))
        .collect::<Vec<_>>()
        .join(" / ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Attaches a [`ClusterAssignment`] to every project with a non-blank
/// description. Order is preserved; undescribed projects pass through untouched.
pub async fn cluster_projects(
    mut projects: Vec<ProjectRecord>,
    embedder: &dyn Embedder,
    projector: &dyn Projector,
) -> Result<Vec<ProjectRecord>, PipelineError> {
    let described: Vec<usize> = projects
        .iter()
        .enumerate()
        .filter(|(_, p)| p.has_description())
        .map(|(i, _)| i)
        .collect();
    if described.is_empty() {
        debug!("No described projects, skipping clustering");
        return Ok(projects);
    }

    let texts: Vec<String> = described
        .iter()
        .map(|&i| projects[i].description.clone())
        .collect();
    let embeddings = embedder.embed(&texts).await?;
    if embeddings.len() != texts.len() {
        return Err(EmbeddingError::CountMismatch {
            expected: texts.len(),
            actual: embeddings.len(),
        }
        .into());
    }

    let n = embeddings.len();
    let k = optimal_k(&embeddings)?;
    let fit = kmeans::fit(&embeddings, k, CLUSTER_SEED)?;

    let n_neighbors = MAX_NEIGHBORS.min(n - 1);
    let coords = if n_neighbors < 2 {
        vec![[0.0, 0.0]; n]
    } else {
        projector.project(&embeddings, n_neighbors)?
    };

    let labels: Vec<String> = (0..k)
        .map(|cluster_id| {
            let members = described
                .iter()
                .zip(&fit.labels)
                .filter(|(_, label)| **label == cluster_id)
                .map(|(&i, _)| (projects[i].name.as_str(), projects[i].description.as_str()));
            cluster_label(cluster_id, members)
        })
        .collect();

    for (slot, &i) in described.iter().enumerate() {
        let cluster_id = fit.labels[slot];
        projects[i].cluster = Some(ClusterAssignment {
            cluster_id,
            cluster_label: labels[cluster_id].clone(),
            x: coords[slot][0],
            y: coords[slot][1],
        });
    }

    info!(projects = n, clusters = k, "Clustering complete");
    Ok(projects)
}
