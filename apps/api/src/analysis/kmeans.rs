//! Seeded k-means (k-means++ seeding, Lloyd iterations) over embedding vectors.
//!
//! Identical input and seed always yield identical labels, which keeps cluster
//! ids stable across repeated analyses of the same portfolio.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

const MAX_ITERATIONS: usize = 300;
const TOLERANCE: f64 = 1e-4;

#[derive(Debug, Error, PartialEq)]
pub enum KMeansError {
    #[error("k must be at least 1")]
    ZeroClusters,

    #[error("cannot form {k} clusters from {samples} samples")]
    TooFewSamples { k: usize, samples: usize },

    #[error("embedding dimensions differ: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Result of one k-means fit.
#[derive(Debug, Clone)]
pub struct KMeansFit {
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances from each point to its assigned centroid.
    pub inertia: f64,
}

/// Fits k-means with `k` clusters.
pub fn fit(points: &[Vec<f32>], k: usize, seed: u64) -> Result<KMeansFit, KMeansError> {
    if k == 0 {
        return Err(KMeansError::ZeroClusters);
    }
    if points.len() < k {
        return Err(KMeansError::TooFewSamples {
            k,
            samples: points.len(),
        });
    }
    let data = to_f64(points)?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut centroids = kmeans_plus_plus(&data, k, &mut rng);
    let mut labels = vec![0usize; data.len()];

    for iteration in 0..MAX_ITERATIONS {
        let changed = assign(&data, &centroids, &mut labels);
        let shift = update_centroids(&data, &labels, &mut centroids);
        if (!changed && iteration > 0) || shift < TOLERANCE {
            break;
        }
    }
    // Final assignment against the settled centroids.
    assign(&data, &centroids, &mut labels);

    let inertia = data
        .iter()
        .zip(&labels)
        .map(|(p, &c)| squared_distance(p, &centroids[c]))
        .sum();

    Ok(KMeansFit {
        labels,
        centroids,
        inertia,
    })
}

fn to_f64(points: &[Vec<f32>]) -> Result<Vec<Vec<f64>>, KMeansError> {
    let expected = points.first().map(Vec::len).unwrap_or(0);
    points
        .iter()
        .map(|p| {
            if p.len() != expected {
                return Err(KMeansError::DimensionMismatch {
                    expected,
                    actual: p.len(),
                });
            }
            Ok(p.iter().map(|&v| v as f64).collect())
        })
        .collect()
}

/// k-means++: first centre uniform, the rest sampled proportionally to D².
fn kmeans_plus_plus(data: &[Vec<f64>], k: usize, rng: &mut ChaCha8Rng) -> Vec<Vec<f64>> {
    let mut chosen = vec![rng.gen_range(0..data.len())];
    let mut min_dist: Vec<f64> = data
        .iter()
        .map(|p| squared_distance(p, &data[chosen[0]]))
        .collect();

    while chosen.len() < k {
        let total: f64 = min_dist.iter().sum();
        let next = if total <= f64::EPSILON {
            // Every point coincides with a centre; take the first unused index.
            (0..data.len())
                .find(|i| !chosen.contains(i))
                .unwrap_or(0)
        } else {
            let mut target = rng.gen::<f64>() * total;
            let mut pick = data.len() - 1;
            for (i, d) in min_dist.iter().enumerate() {
                if target < *d {
                    pick = i;
                    break;
                }
                target -= d;
            }
            pick
        };
        chosen.push(next);
        for (i, p) in data.iter().enumerate() {
            let d = squared_distance(p, &data[next]);
            if d < min_dist[i] {
                min_dist[i] = d;
            }
        }
    }

    chosen.into_iter().map(|i| data[i].clone()).collect()
}

/// Assigns each point to its nearest centroid. Returns whether any label moved.
fn assign(data: &[Vec<f64>], centroids: &[Vec<f64>], labels: &mut [usize]) -> bool {
    let mut changed = false;
    for (i, p) in data.iter().enumerate() {
        let nearest = nearest_centroid(p, centroids);
        if labels[i] != nearest {
            labels[i] = nearest;
            changed = true;
        }
    }
    changed
}

fn nearest_centroid(p: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (c, centroid) in centroids.iter().enumerate() {
        let d = squared_distance(p, centroid);
        if d < best_dist {
            best_dist = d;
            best = c;
        }
    }
    best
}

/// Recomputes centroids as member means; empty clusters keep their centroid.
/// Returns the total squared centroid shift.
fn update_centroids(data: &[Vec<f64>], labels: &[usize], centroids: &mut [Vec<f64>]) -> f64 {
    let dim = data.first().map(Vec::len).unwrap_or(0);
    let mut sums = vec![vec![0.0f64; dim]; centroids.len()];
    let mut counts = vec![0usize; centroids.len()];

    for (p, &c) in data.iter().zip(labels) {
        counts[c] += 1;
        for (s, v) in sums[c].iter_mut().zip(p) {
            *s += v;
        }
    }

    let mut shift = 0.0;
    for (c, sum) in sums.into_iter().enumerate() {
        if counts[c] == 0 {
            continue;
        }
        let mean: Vec<f64> = sum.into_iter().map(|s| s / counts[c] as f64).collect();
        shift += squared_distance(&mean, &centroids[c]);
        centroids[c] = mean;
    }
    shift
}

pub(crate) fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
