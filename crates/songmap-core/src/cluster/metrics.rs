//! Cluster quality scores
//!
//! Both scores ignore samples labelled `-1` (noise).

use std::collections::BTreeMap;

use rayon::prelude::*;

use super::kmeans::squared_distance;

pub const NOISE_LABEL: i32 = -1;

fn distance(a: &[f64], b: &[f64]) -> f64 {
    squared_distance(a, b).sqrt()
}

/// Drop noise-labelled samples
fn masked<'a>(data: &'a [Vec<f64>], labels: &[i32]) -> (Vec<&'a [f64]>, Vec<i32>) {
    data.iter()
        .zip(labels)
        .filter(|(_, l)| **l != NOISE_LABEL)
        .map(|(row, &l)| (row.as_slice(), l))
        .unzip()
}

fn distinct_labels(labels: &[i32]) -> Vec<i32> {
    let mut distinct = labels.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    distinct
}

/// Mean silhouette coefficient in [-1, 1], higher is better
///
/// NaN unless there are between 2 and n-1 distinct labels. A sample alone
/// in its cluster scores 0.
pub fn silhouette_score(data: &[Vec<f64>], labels: &[i32]) -> f64 {
    let (rows, labels) = masked(data, labels);
    let n = rows.len();
    let clusters = distinct_labels(&labels);
    if clusters.len() < 2 || clusters.len() >= n {
        return f64::NAN;
    }

    let index: BTreeMap<i32, usize> = clusters.iter().enumerate().map(|(i, &l)| (l, i)).collect();
    let mut sizes = vec![0usize; clusters.len()];
    for l in &labels {
        sizes[index[l]] += 1;
    }

    let total: f64 = (0..n)
        .into_par_iter()
        .map(|i| {
            let own = index[&labels[i]];
            if sizes[own] <= 1 {
                return 0.0;
            }

            let mut sums = vec![0.0; clusters.len()];
            for (j, row) in rows.iter().enumerate() {
                if j != i {
                    sums[index[&labels[j]]] += distance(rows[i], row);
                }
            }

            let a = sums[own] / (sizes[own] - 1) as f64;
            let b = sums
                .iter()
                .zip(&sizes)
                .enumerate()
                .filter(|(c, _)| *c != own)
                .map(|(_, (sum, &size))| sum / size as f64)
                .fold(f64::INFINITY, f64::min);

            let denom = a.max(b);
            if denom > 0.0 {
                (b - a) / denom
            } else {
                0.0
            }
        })
        .sum();

    total / n as f64
}

/// Davies-Bouldin index, lower is better; NaN with fewer than 2 labels
pub fn davies_bouldin_score(data: &[Vec<f64>], labels: &[i32]) -> f64 {
    let (rows, labels) = masked(data, labels);
    let clusters = distinct_labels(&labels);
    if clusters.len() < 2 {
        return f64::NAN;
    }
    let dim = rows[0].len();

    let members: Vec<Vec<&[f64]>> = clusters
        .iter()
        .map(|&c| {
            rows.iter()
                .zip(&labels)
                .filter(|(_, l)| **l == c)
                .map(|(row, _)| *row)
                .collect()
        })
        .collect();

    let centroids: Vec<Vec<f64>> = members
        .iter()
        .map(|points| {
            let mut centroid = vec![0.0; dim];
            for p in points {
                for (c, v) in centroid.iter_mut().zip(p.iter()) {
                    *c += v;
                }
            }
            centroid.iter_mut().for_each(|c| *c /= points.len() as f64);
            centroid
        })
        .collect();

    let scatter: Vec<f64> = members
        .iter()
        .zip(&centroids)
        .map(|(points, centroid)| {
            points.iter().map(|p| distance(p, centroid)).sum::<f64>() / points.len() as f64
        })
        .collect();

    let k = clusters.len();
    let worst_ratios: f64 = (0..k)
        .map(|i| {
            (0..k)
                .filter(|&j| j != i)
                .map(|j| {
                    let separation = distance(&centroids[i], &centroids[j]);
                    if separation > 0.0 {
                        (scatter[i] + scatter[j]) / separation
                    } else {
                        0.0
                    }
                })
                .fold(0.0, f64::max)
        })
        .sum();

    worst_ratios / k as f64
}
