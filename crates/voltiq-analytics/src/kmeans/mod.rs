//! K-means grouping of projects by profit margin, delivery time and payment
//! recovery.
//!
//! Features are min-max normalised per dimension before distances are taken,
//! so days and percentages weigh equally. Clusters are then ranked by the raw
//! mean profit margin of their members and labelled from best to worst.

mod random;

use serde::Serialize;
use voltiq_core::ServiceProfitabilityRecord;

use crate::error::ClusterError;

use random::shuffled_indices;
pub use random::{RandomSource, SeededRandom, SystemRandom};

const FEATURES: usize = 3;

type Point = [f64; FEATURES];

/// Labels for the first four ranks; lower ranks fall back to `"Cluster {n}"`.
const RANK_LABELS: [&str; 4] = ["High Performer", "Good", "Needs Attention", "At Risk"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KMeansConfig {
    pub k: usize,
    pub max_iterations: usize,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 3,
            max_iterations: 50,
        }
    }
}

/// A project with the rank-ordered cluster it was assigned to.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusteredProject {
    pub project: ServiceProfitabilityRecord,
    pub cluster: usize,
    pub label: String,
}

/// Aggregate view of one cluster. Empty clusters report zeros.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    pub id: usize,
    pub label: String,
    pub count: usize,
    pub avg_profit_margin: f64,
    pub avg_days_to_completion: f64,
    pub avg_payment_recovery: f64,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_profit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusteringResult {
    /// Input projects in input order.
    pub projects: Vec<ClusteredProject>,
    /// One entry per cluster id, in id order.
    pub summaries: Vec<ClusterSummary>,
    pub iterations: usize,
    /// `false` when the iteration cap was reached before assignments settled.
    pub converged: bool,
}

/// Scatter-plot point: x = days to completion, y = profit margin,
/// z = payment recovery days.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub name: String,
    pub service: String,
    pub revenue: f64,
    pub cluster: usize,
    pub label: String,
}

/// Min-max rescale into `[0, 1]`. A constant column maps to all zeros.
#[must_use]
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range == 0.0 || !range.is_finite() {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - min) / range).collect()
}

/// Cluster `projects` into `k` groups with a 50-iteration cap.
///
/// # Errors
///
/// Returns [`ClusterError::ZeroClusters`] when `k` is 0.
pub fn perform_kmeans_clustering(
    projects: &[ServiceProfitabilityRecord],
    k: usize,
    rng: &mut impl RandomSource,
) -> Result<ClusteringResult, ClusterError> {
    let config = KMeansConfig {
        k,
        ..KMeansConfig::default()
    };
    perform_kmeans_clustering_with(projects, &config, rng)
}

/// Cluster `projects` using an explicit configuration.
///
/// `k` larger than the number of projects is clamped to it. Empty input yields
/// an empty result.
///
/// # Errors
///
/// Returns [`ClusterError::ZeroClusters`] when `config.k` is 0 and
/// [`ClusterError::ZeroIterations`] when `config.max_iterations` is 0.
pub fn perform_kmeans_clustering_with(
    projects: &[ServiceProfitabilityRecord],
    config: &KMeansConfig,
    rng: &mut impl RandomSource,
) -> Result<ClusteringResult, ClusterError> {
    if config.k == 0 {
        return Err(ClusterError::ZeroClusters);
    }
    if config.max_iterations == 0 {
        return Err(ClusterError::ZeroIterations);
    }
    if projects.is_empty() {
        return Ok(ClusteringResult {
            projects: Vec::new(),
            summaries: Vec::new(),
            iterations: 0,
            converged: true,
        });
    }

    let k = config.k.min(projects.len());
    let points = feature_matrix(projects);

    let mut centroids: Vec<Point> = shuffled_indices(points.len(), rng)
        .into_iter()
        .take(k)
        .map(|i| points[i])
        .collect();

    let mut assignments = assign(&points, &centroids);
    let mut iterations = 1;
    let mut converged = false;
    while iterations < config.max_iterations {
        update_centroids(&points, &assignments, &mut centroids);
        let next = assign(&points, &centroids);
        iterations += 1;
        if next == assignments {
            converged = true;
            break;
        }
        assignments = next;
    }

    tracing::debug!(
        projects = projects.len(),
        k,
        iterations,
        converged,
        "k-means finished"
    );

    let rank_of = rank_clusters(projects, &assignments, k);
    let labels: Vec<String> = (0..k).map(rank_label).collect();

    let clustered = projects
        .iter()
        .zip(&assignments)
        .map(|(project, &raw)| {
            let cluster = rank_of[raw];
            ClusteredProject {
                project: project.clone(),
                cluster,
                label: labels[cluster].clone(),
            }
        })
        .collect::<Vec<_>>();

    let summaries = summarize(&clustered, &labels);

    Ok(ClusteringResult {
        projects: clustered,
        summaries,
        iterations,
        converged,
    })
}

/// Flatten a clustering result into scatter-plot points, one per project.
#[must_use]
pub fn prepare_clustering_chart_data(result: &ClusteringResult) -> Vec<ClusterPoint> {
    result
        .projects
        .iter()
        .map(|cp| ClusterPoint {
            x: cp.project.days_to_completion,
            y: cp.project.avg_profit_margin_pct,
            z: cp.project.payment_recovery_days,
            name: cp.project.project_label().to_string(),
            service: cp.project.display_name().to_string(),
            revenue: cp.project.total_revenue,
            cluster: cp.cluster,
            label: cp.label.clone(),
        })
        .collect()
}

fn rank_label(rank: usize) -> String {
    RANK_LABELS
        .get(rank)
        .map_or_else(|| format!("Cluster {}", rank + 1), |l| (*l).to_string())
}

fn feature_matrix(projects: &[ServiceProfitabilityRecord]) -> Vec<Point> {
    let columns: [Vec<f64>; FEATURES] = [
        normalize(
            &projects
                .iter()
                .map(|p| p.avg_profit_margin_pct)
                .collect::<Vec<_>>(),
        ),
        normalize(
            &projects
                .iter()
                .map(|p| p.days_to_completion)
                .collect::<Vec<_>>(),
        ),
        normalize(
            &projects
                .iter()
                .map(|p| p.payment_recovery_days)
                .collect::<Vec<_>>(),
        ),
    ];
    (0..projects.len())
        .map(|i| [columns[0][i], columns[1][i], columns[2][i]])
        .collect()
}

fn distance(a: &Point, b: &Point) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Nearest centroid per point. Ties go to the lowest centroid index.
fn assign(points: &[Point], centroids: &[Point]) -> Vec<usize> {
    points
        .iter()
        .map(|p| {
            let mut best = 0;
            let mut best_dist = f64::INFINITY;
            for (i, c) in centroids.iter().enumerate() {
                let d = distance(p, c);
                if d < best_dist {
                    best = i;
                    best_dist = d;
                }
            }
            best
        })
        .collect()
}

/// Move each centroid to the mean of its members. Empty clusters stay put.
fn update_centroids(points: &[Point], assignments: &[usize], centroids: &mut [Point]) {
    let mut sums = vec![[0.0; FEATURES]; centroids.len()];
    let mut counts = vec![0_usize; centroids.len()];
    for (p, &c) in points.iter().zip(assignments) {
        for (s, v) in sums[c].iter_mut().zip(p) {
            *s += v;
        }
        counts[c] += 1;
    }
    for ((centroid, sum), count) in centroids.iter_mut().zip(sums).zip(counts) {
        if count > 0 {
            #[allow(clippy::cast_precision_loss)]
            let n = count as f64;
            *centroid = sum.map(|s| s / n);
        }
    }
}

/// Map each raw cluster index to its rank by descending mean profit margin.
///
/// Empty clusters rank last; equal means keep the lower raw index first.
fn rank_clusters(
    projects: &[ServiceProfitabilityRecord],
    assignments: &[usize],
    k: usize,
) -> Vec<usize> {
    let mut sums = vec![0.0; k];
    let mut counts = vec![0_usize; k];
    for (p, &c) in projects.iter().zip(assignments) {
        sums[c] += p.avg_profit_margin_pct;
        counts[c] += 1;
    }
    let means: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(s, &n)| {
            #[allow(clippy::cast_precision_loss)]
            let n = n.max(1) as f64;
            s / n
        })
        .collect();

    let mut order: Vec<usize> = (0..k).collect();
    order.sort_by(|&a, &b| {
        (counts[a] == 0)
            .cmp(&(counts[b] == 0))
            .then_with(|| means[b].total_cmp(&means[a]))
    });

    let mut rank_of = vec![0; k];
    for (rank, raw) in order.into_iter().enumerate() {
        rank_of[raw] = rank;
    }
    rank_of
}

fn summarize(clustered: &[ClusteredProject], labels: &[String]) -> Vec<ClusterSummary> {
    labels
        .iter()
        .enumerate()
        .map(|(id, label)| {
            let members: Vec<&ServiceProfitabilityRecord> = clustered
                .iter()
                .filter(|cp| cp.cluster == id)
                .map(|cp| &cp.project)
                .collect();
            let mean = |f: fn(&ServiceProfitabilityRecord) -> f64| {
                if members.is_empty() {
                    0.0
                } else {
                    #[allow(clippy::cast_precision_loss)]
                    let n = members.len() as f64;
                    members.iter().copied().map(f).sum::<f64>() / n
                }
            };
            ClusterSummary {
                id,
                label: label.clone(),
                count: members.len(),
                avg_profit_margin: mean(|p| p.avg_profit_margin_pct),
                avg_days_to_completion: mean(|p| p.days_to_completion),
                avg_payment_recovery: mean(|p| p.payment_recovery_days),
                total_revenue: members.iter().map(|p| p.total_revenue).sum(),
                total_cost: members.iter().map(|p| p.total_cost).sum(),
                total_profit: members.iter().map(|p| p.total_profit).sum(),
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../kmeans_test.rs"]
mod tests;
