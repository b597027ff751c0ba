//! 2D layout of project embeddings for the cluster scatter plot.
//!
//! `StressLayout` is a Sammon-style nonlinear projection: it minimises
//! Σ w_ij (‖x_i − x_j‖ − d_ij)² with weights `1/d_ij`, where pairs outside each
//! point's `n_neighbors` nearest neighbours are down-weighted so local
//! structure dominates. Optimisation is node-wise stress majorization from a
//! seeded random start.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

const LAYOUT_SEED: u64 = 42;
const ITERATIONS: usize = 300;
const NON_NEIGHBOR_WEIGHT: f64 = 0.05;
const MIN_DISTANCE: f64 = 1e-9;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("need at least 2 neighbours for a layout, got {0}")]
    TooFewNeighbors(usize),

    #[error("embedding dimensions differ: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Reduces embeddings to 2D coordinates, one `[x, y]` per input vector.
pub trait Projector: Send + Sync {
    fn project(
        &self,
        embeddings: &[Vec<f32>],
        n_neighbors: usize,
    ) -> Result<Vec<[f64; 2]>, ProjectionError>;
}

/// Neighbourhood-weighted stress majorization.
#[derive(Debug, Clone)]
pub struct StressLayout {
    seed: u64,
    iterations: usize,
}

impl Default for StressLayout {
    fn default() -> Self {
        Self {
            seed: LAYOUT_SEED,
            iterations: ITERATIONS,
        }
    }
}

impl Projector for StressLayout {
    fn project(
        &self,
        embeddings: &[Vec<f32>],
        n_neighbors: usize,
    ) -> Result<Vec<[f64; 2]>, ProjectionError> {
        if n_neighbors < 2 {
            return Err(ProjectionError::TooFewNeighbors(n_neighbors));
        }
        let distances = pairwise_distances(embeddings)?;
        let n = distances.len();
        let weights = neighborhood_weights(&distances, n_neighbors.min(n.saturating_sub(1)));

        let mean_distance = mean_off_diagonal(&distances).max(MIN_DISTANCE);
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut layout: Vec<[f64; 2]> = (0..n)
            .map(|_| {
                [
                    rng.gen_range(-1.0..1.0) * mean_distance,
                    rng.gen_range(-1.0..1.0) * mean_distance,
                ]
            })
            .collect();

        for _ in 0..self.iterations {
            for i in 0..n {
                let mut num = [0.0f64; 2];
                let mut den = 0.0f64;
                for j in 0..n {
                    if i == j || weights[i][j] == 0.0 {
                        continue;
                    }
                    let dx = layout[i][0] - layout[j][0];
                    let dy = layout[i][1] - layout[j][1];
                    let current = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                    let w = weights[i][j];
                    num[0] += w * (layout[j][0] + distances[i][j] * dx / current);
                    num[1] += w * (layout[j][1] + distances[i][j] * dy / current);
                    den += w;
                }
                if den > 0.0 {
                    layout[i] = [num[0] / den, num[1] / den];
                }
            }
        }

        Ok(center(layout))
    }
}

fn pairwise_distances(embeddings: &[Vec<f32>]) -> Result<Vec<Vec<f64>>, ProjectionError> {
    let expected = embeddings.first().map(Vec::len).unwrap_or(0);
    if let Some(bad) = embeddings.iter().find(|e| e.len() != expected) {
        return Err(ProjectionError::DimensionMismatch {
            expected,
            actual: bad.len(),
        });
    }

    let n = embeddings.len();
    let mut distances = vec![vec![0.0f64; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = embeddings[i]
                .iter()
                .zip(&embeddings[j])
                .map(|(a, b)| {
                    let diff = (*a as f64) - (*b as f64);
                    diff * diff
                })
                .sum::<f64>()
                .sqrt();
            distances[i][j] = d;
            distances[j][i] = d;
        }
    }
    Ok(distances)
}

/// Sammon weights `1/d`, full strength for k-nearest-neighbour pairs
/// (symmetrised) and `NON_NEIGHBOR_WEIGHT` otherwise.
fn neighborhood_weights(distances: &[Vec<f64>], k: usize) -> Vec<Vec<f64>> {
    let n = distances.len();
    let mut is_neighbor = vec![vec![false; n]; n];
    for i in 0..n {
        let mut order: Vec<usize> = (0..n).filter(|&j| j != i).collect();
        order.sort_by(|&a, &b| {
            distances[i][a]
                .partial_cmp(&distances[i][b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for &j in order.iter().take(k) {
            is_neighbor[i][j] = true;
            is_neighbor[j][i] = true;
        }
    }

    let mut weights = vec![vec![0.0f64; n]; n];
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let scale = if is_neighbor[i][j] { 1.0 } else { NON_NEIGHBOR_WEIGHT };
            weights[i][j] = scale / distances[i][j].max(MIN_DISTANCE);
        }
    }
    weights
}

fn mean_off_diagonal(distances: &[Vec<f64>]) -> f64 {
    let n = distances.len();
    if n < 2 {
        return 0.0;
    }
    let total: f64 = distances.iter().flatten().sum();
    total / (n * (n - 1)) as f64
}

fn center(mut layout: Vec<[f64; 2]>) -> Vec<[f64; 2]> {
    if layout.is_empty() {
        return layout;
    }
    let n = layout.len() as f64;
    let cx = layout.iter().map(|p| p[0]).sum::<f64>() / n;
    let cy = layout.iter().map(|p| p[1]).sum::<f64>() / n;
    for p in &mut layout {
        p[0] -= cx;
        p[1] -= cy;
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(a: [f64; 2], b: [f64; 2]) -> f64 {
        ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
    }

    #[test]
    fn test_rejects_fewer_than_two_neighbors() {
        let err = StressLayout::default()
            .project(&[vec![0.0], vec![1.0]], 1)
            .unwrap_err();
        assert!(matches!(err, ProjectionError::TooFewNeighbors(1)));
    }

    #[test]
    fn test_triangle_distances_are_preserved() {
        // Right triangle with legs 3 and 4 embedded in 3D.
        let embeddings = vec![vec![0.0, 0.0, 0.0], vec![3.0, 0.0, 0.0], vec![0.0, 4.0, 0.0]];
        let layout = StressLayout::default().project(&embeddings, 2).unwrap();
        assert!((dist(layout[0], layout[1]) - 3.0).abs() < 0.05);
        assert!((dist(layout[0], layout[2]) - 4.0).abs() < 0.05);
        assert!((dist(layout[1], layout[2]) - 5.0).abs() < 0.05);
    }

    #[test]
    fn test_close_points_stay_closer_than_far_ones() {
        let embeddings = vec![
            vec![0.0, 0.0, 1.0],
            vec![0.1, 0.0, 1.0],
            vec![0.0, 0.1, 1.0],
            vec![4.0, 4.0, 0.0],
        ];
        let layout = StressLayout::default().project(&embeddings, 3).unwrap();
        let near = dist(layout[0], layout[1]);
        let far = dist(layout[0], layout[3]);
        assert!(near < far);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0], vec![2.0, 2.0]];
        let a = StressLayout::default().project(&embeddings, 3).unwrap();
        let b = StressLayout::default().project(&embeddings, 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_layout_is_centered() {
        let embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![3.0, 3.0]];
        let layout = StressLayout::default().project(&embeddings, 2).unwrap();
        let cx: f64 = layout.iter().map(|p| p[0]).sum();
        let cy: f64 = layout.iter().map(|p| p[1]).sum();
        assert!(cx.abs() < 1e-9 && cy.abs() < 1e-9);
    }
}
