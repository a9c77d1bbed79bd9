//! Principal component analysis via thin SVD

use faer::Mat;

use super::error::{ClusterError, Result};
use super::scale::check_rectangular;

/// Fitted PCA projection
#[derive(Debug, Clone)]
pub struct Pca {
    mean: Vec<f64>,
    /// One loading vector (length = features) per kept component
    components: Vec<Vec<f64>>,
    explained_variance_ratio: Vec<f64>,
}

impl Pca {
    /// Fit on `data` keeping enough components to explain more than
    /// `variance_fraction` of the variance (1.0 keeps all)
    pub fn fit(data: &[Vec<f64>], variance_fraction: f64) -> Result<Self> {
        if !(variance_fraction > 0.0 && variance_fraction <= 1.0) {
            return Err(ClusterError::InvalidParameter(format!(
                "variance fraction must be in (0, 1], got {}",
                variance_fraction
            )));
        }
        let dim = check_rectangular(data)?;
        let n = data.len();
        if n < 2 {
            return Err(ClusterError::NotEnoughSamples { needed: 2, found: n });
        }

        let mean: Vec<f64> = (0..dim)
            .map(|j| data.iter().map(|row| row[j]).sum::<f64>() / n as f64)
            .collect();
        let centred = Mat::<f64>::from_fn(n, dim, |i, j| data[i][j] - mean[j]);

        let svd = centred.thin_svd();
        let s = svd.s_diagonal();
        let v = svd.v();
        let rank = n.min(dim);

        let squared: Vec<f64> = (0..rank).map(|i| s.read(i) * s.read(i)).collect();
        let total: f64 = squared.iter().sum();
        let ratios: Vec<f64> = if total > 0.0 {
            squared.iter().map(|sq| sq / total).collect()
        } else {
            vec![0.0; rank]
        };

        let n_components = components_for_fraction(&ratios, variance_fraction);

        let components = (0..n_components)
            .map(|c| {
                let mut loading: Vec<f64> = (0..dim).map(|j| v.read(j, c)).collect();
                normalise_sign(&mut loading);
                loading
            })
            .collect();

        log::debug!(
            "Pca::fit: {} samples x {} features -> {} components ({:.3} variance)",
            n,
            dim,
            n_components,
            ratios[..n_components].iter().sum::<f64>()
        );

        Ok(Self {
            mean,
            components,
            explained_variance_ratio: ratios[..n_components].to_vec(),
        })
    }

    /// Project rows onto the kept components
    pub fn transform(&self, data: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        data.iter()
            .map(|row| {
                if row.len() != self.mean.len() {
                    return Err(ClusterError::DimensionMismatch {
                        expected: self.mean.len(),
                        found: row.len(),
                    });
                }
                Ok(self
                    .components
                    .iter()
                    .map(|loading| {
                        row.iter()
                            .zip(&self.mean)
                            .zip(loading)
                            .map(|((x, m), w)| (x - m) * w)
                            .sum()
                    })
                    .collect())
            })
            .collect()
    }

    pub fn n_components(&self) -> usize {
        self.components.len()
    }

    pub fn components(&self) -> &[Vec<f64>] {
        &self.components
    }

    pub fn explained_variance_ratio(&self) -> &[f64] {
        &self.explained_variance_ratio
    }

    pub fn explained_variance(&self) -> f64 {
        self.explained_variance_ratio.iter().sum()
    }
}

/// Smallest k whose cumulative ratio is strictly above `fraction`, at least 1
fn components_for_fraction(ratios: &[f64], fraction: f64) -> usize {
    let mut cumulative = 0.0;
    for (i, ratio) in ratios.iter().enumerate() {
        cumulative += ratio;
        if cumulative > fraction {
            return i + 1;
        }
    }
    if cumulative > 0.0 {
        ratios.len()
    } else {
        1
    }
}

/// Flip so the largest-magnitude loading is positive
fn normalise_sign(loading: &mut [f64]) {
    let pivot = loading
        .iter()
        .copied()
        .max_by(|a, b| a.abs().total_cmp(&b.abs()))
        .unwrap_or(0.0);
    if pivot < 0.0 {
        loading.iter_mut().for_each(|w| *w = -*w);
    }
}
