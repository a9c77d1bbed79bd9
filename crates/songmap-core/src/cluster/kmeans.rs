//! Lloyd's k-means with k-means++ seeding

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::{ClusterError, Result};
use super::scale::check_rectangular;

/// k-means parameters
#[derive(Debug, Clone)]
pub struct KMeans {
    pub n_clusters: usize,
    pub seed: u64,
    /// Independent restarts; the lowest inertia wins
    pub n_init: usize,
    pub max_iter: usize,
    /// Convergence threshold, relative to the mean feature variance
    pub tolerance: f64,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            n_clusters: 4,
            seed: 42,
            n_init: 10,
            max_iter: 300,
            tolerance: 1e-4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct KMeansResult {
    pub labels: Vec<i32>,
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances to the assigned centroid
    pub inertia: f64,
    /// Iterations of the winning run
    pub iterations: usize,
}

impl KMeans {
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            ..Default::default()
        }
    }

    pub fn fit(&self, data: &[Vec<f64>]) -> Result<KMeansResult> {
        if self.n_clusters == 0 {
            return Err(ClusterError::InvalidParameter("n_clusters must be at least 1".to_string()));
        }
        if data.len() < self.n_clusters {
            return Err(ClusterError::NotEnoughSamples {
                needed: self.n_clusters,
                found: data.len(),
            });
        }
        check_rectangular(data)?;

        let threshold = self.tolerance * mean_variance(data);
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut best: Option<KMeansResult> = None;
        for run in 0..self.n_init.max(1) {
            let initial = kmeans_plus_plus(data, self.n_clusters, &mut rng);
            let result = self.lloyd(data, initial, threshold);
            log::debug!(
                "KMeans::fit: run {} inertia {:.6} after {} iterations",
                run,
                result.inertia,
                result.iterations
            );
            if best.as_ref().map_or(true, |b| result.inertia < b.inertia) {
                best = Some(result);
            }
        }

        best.ok_or_else(|| ClusterError::InvalidParameter("n_init must be at least 1".to_string()))
    }

    fn lloyd(&self, data: &[Vec<f64>], mut centroids: Vec<Vec<f64>>, threshold: f64) -> KMeansResult {
        let dim = data[0].len();
        let mut labels = vec![0usize; data.len()];
        let mut iterations = 0;

        for _ in 0..self.max_iter.max(1) {
            iterations += 1;
            assign(data, &centroids, &mut labels);

            let mut sums = vec![vec![0.0; dim]; self.n_clusters];
            let mut counts = vec![0usize; self.n_clusters];
            for (row, &label) in data.iter().zip(&labels) {
                counts[label] += 1;
                for (s, v) in sums[label].iter_mut().zip(row) {
                    *s += v;
                }
            }

            let mut updated: Vec<Vec<f64>> = sums
                .into_iter()
                .zip(&counts)
                .map(|(sum, &count)| {
                    if count == 0 {
                        sum
                    } else {
                        sum.into_iter().map(|s| s / count as f64).collect()
                    }
                })
                .collect();

            for cluster in (0..self.n_clusters).filter(|&c| counts[c] == 0) {
                let farthest = farthest_point(data, &updated, &labels);
                updated[cluster] = data[farthest].clone();
                labels[farthest] = cluster;
            }

            let shift: f64 = centroids
                .iter()
                .zip(&updated)
                .map(|(old, new)| squared_distance(old, new))
                .sum();
            centroids = updated;

            if shift <= threshold {
                break;
            }
        }

        // Final assignment against the converged centroids
        assign(data, &centroids, &mut labels);
        let inertia = data
            .iter()
            .zip(&labels)
            .map(|(row, &label)| squared_distance(row, &centroids[label]))
            .sum();

        KMeansResult {
            labels: labels.into_iter().map(|l| l as i32).collect(),
            centroids,
            inertia,
            iterations,
        }
    }
}

/// k-means++: first centre uniform, the rest sampled by squared distance
fn kmeans_plus_plus(data: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(data[rng.gen_range(0..data.len())].clone());

    let mut closest: Vec<f64> = data.iter().map(|row| squared_distance(row, &centroids[0])).collect();

    while centroids.len() < k {
        let total: f64 = closest.iter().sum();
        let next = if total > 0.0 {
            let mut target = rng.gen::<f64>() * total;
            closest
                .iter()
                .position(|&d| {
                    target -= d;
                    target < 0.0
                })
                .unwrap_or(data.len() - 1)
        } else {
            // All points coincide with a centre
            rng.gen_range(0..data.len())
        };

        let centre = data[next].clone();
        for (d, row) in closest.iter_mut().zip(data) {
            *d = d.min(squared_distance(row, &centre));
        }
        centroids.push(centre);
    }

    centroids
}

fn assign(data: &[Vec<f64>], centroids: &[Vec<f64>], labels: &mut [usize]) {
    for (row, label) in data.iter().zip(labels.iter_mut()) {
        *label = nearest(row, centroids).0;
    }
}

fn nearest(row: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    centroids
        .iter()
        .enumerate()
        .map(|(i, c)| (i, squared_distance(row, c)))
        .fold((0, f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best })
}

/// Index of the point farthest from its assigned centroid
fn farthest_point(data: &[Vec<f64>], centroids: &[Vec<f64>], labels: &[usize]) -> usize {
    data.iter()
        .zip(labels)
        .map(|(row, &label)| squared_distance(row, &centroids[label]))
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, d)| if d > best.1 { (i, d) } else { best })
        .0
}

fn mean_variance(data: &[Vec<f64>]) -> f64 {
    let n = data.len() as f64;
    let dim = data[0].len();
    if dim == 0 {
        return 0.0;
    }
    let total: f64 = (0..dim)
        .map(|j| {
            let mean = data.iter().map(|r| r[j]).sum::<f64>() / n;
            data.iter().map(|r| (r[j] - mean).powi(2)).sum::<f64>() / n
        })
        .sum();
    total / dim as f64
}

pub(crate) fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
