//! Per-feature min/max scaling to [0, 1]

use super::error::{ClusterError, Result};

#[derive(Debug, Clone)]
pub struct MinMaxScaler {
    min: Vec<f64>,
    range: Vec<f64>,
}

impl MinMaxScaler {
    pub fn fit(data: &[Vec<f64>]) -> Result<Self> {
        let dim = check_rectangular(data)?;

        let mut min = vec![f64::INFINITY; dim];
        let mut max = vec![f64::NEG_INFINITY; dim];
        for row in data {
            for (j, &v) in row.iter().enumerate() {
                min[j] = min[j].min(v);
                max[j] = max[j].max(v);
            }
        }
        let range = min.iter().zip(&max).map(|(lo, hi)| hi - lo).collect();

        Ok(Self { min, range })
    }

    /// Scale rows; constant features map to 0
    pub fn transform(&self, data: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        data.iter()
            .map(|row| {
                if row.len() != self.min.len() {
                    return Err(ClusterError::DimensionMismatch {
                        expected: self.min.len(),
                        found: row.len(),
                    });
                }
                Ok(row
                    .iter()
                    .zip(self.min.iter().zip(&self.range))
                    .map(|(v, (lo, range))| if *range > 0.0 { (v - lo) / range } else { 0.0 })
                    .collect())
            })
            .collect()
    }

    pub fn fit_transform(data: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        Self::fit(data)?.transform(data)
    }
}

/// Shared row length of a non-empty rectangular matrix
pub(crate) fn check_rectangular(data: &[Vec<f64>]) -> Result<usize> {
    let first = data.first().ok_or(ClusterError::NotEnoughSamples {
        needed: 1,
        found: 0,
    })?;
    let dim = first.len();
    if let Some((row, bad)) = data.iter().enumerate().find(|(_, r)| r.len() != dim) {
        return Err(ClusterError::RaggedInput {
            row,
            expected: dim,
            found: bad.len(),
        });
    }
    Ok(dim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scales_each_column() {
        let data = vec![vec![0.0, 10.0], vec![5.0, 20.0], vec![10.0, 30.0]];
        let scaled = MinMaxScaler::fit_transform(&data).unwrap();
        assert_eq!(scaled, vec![vec![0.0, 0.0], vec![0.5, 0.5], vec![1.0, 1.0]]);
    }

    #[test]
    fn test_constant_column_is_zero() {
        let data = vec![vec![3.0, 1.0], vec![3.0, 2.0]];
        let scaled = MinMaxScaler::fit_transform(&data).unwrap();
        assert_eq!(scaled[0][0], 0.0);
        assert_eq!(scaled[1][0], 0.0);
    }

    #[test]
    fn test_transform_outside_fitted_range() {
        let scaler = MinMaxScaler::fit(&[vec![0.0], vec![2.0]]).unwrap();
        assert_eq!(scaler.transform(&[vec![4.0]]).unwrap(), vec![vec![2.0]]);
    }

    #[test]
    fn test_rejects_empty_and_ragged() {
        assert!(MinMaxScaler::fit(&[]).is_err());
        let err = MinMaxScaler::fit(&[vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert!(matches!(err, ClusterError::RaggedInput { row: 1, .. }));
    }
}
