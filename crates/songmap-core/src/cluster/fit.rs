//! Embeddings → cluster table
//!
//! Scale every feature to [0, 1], reduce with PCA, cluster the reduced
//! vectors with k-means and plot each song at its first two principal
//! coordinates.

use crate::config::FitConfig;
use crate::embedding::EmbeddingStore;

use super::error::{ClusterError, Result};
use super::kmeans::KMeans;
use super::metrics::{davies_bouldin_score, silhouette_score};
use super::pca::Pca;
use super::scale::MinMaxScaler;
use super::table::{ClusterRow, ClusterTable};

/// Outcome of one fit
#[derive(Debug, Clone)]
pub struct FitReport {
    pub table: ClusterTable,
    pub silhouette: f64,
    pub davies_bouldin: f64,
    /// PCA components kept
    pub n_components: usize,
    /// Fraction of variance those components explain
    pub explained_variance: f64,
    pub inertia: f64,
}

pub fn run_fit(store: &EmbeddingStore, config: &FitConfig) -> Result<FitReport> {
    let names: Vec<&str> = store.iter().map(|(name, _)| name).collect();
    let data: Vec<Vec<f64>> = store
        .iter()
        .map(|(_, v)| v.iter().map(|&x| x as f64).collect())
        .collect();

    let needed = config.n_clusters.max(2);
    if data.len() < needed {
        return Err(ClusterError::NotEnoughSamples {
            needed,
            found: data.len(),
        });
    }

    log::info!(
        "run_fit: {} embeddings x {} dims, {} clusters",
        data.len(),
        store.dimension().unwrap_or(0),
        config.n_clusters
    );

    let scaled = MinMaxScaler::fit_transform(&data)?;
    let pca = Pca::fit(&scaled, config.pca_variance)?;
    let reduced = pca.transform(&scaled)?;

    log::info!(
        "run_fit: PCA kept {} components ({:.1}% variance)",
        pca.n_components(),
        pca.explained_variance() * 100.0
    );

    let kmeans = KMeans {
        n_clusters: config.n_clusters,
        seed: config.seed,
        n_init: config.n_init,
        max_iter: config.max_iter,
        tolerance: config.tolerance,
    };
    let clustering = kmeans.fit(&reduced)?;

    let silhouette = silhouette_score(&reduced, &clustering.labels);
    let davies_bouldin = davies_bouldin_score(&reduced, &clustering.labels);

    let rows = names
        .iter()
        .zip(&reduced)
        .zip(&clustering.labels)
        .map(|((name, coords), &label)| {
            let x = coords.first().copied().unwrap_or(0.0);
            let y = coords.get(1).copied().unwrap_or(0.0);
            ClusterRow::for_audio(name, x, y, label)
        })
        .collect();

    log::info!(
        "run_fit: inertia {:.4}, silhouette {:.4}, davies-bouldin {:.4}",
        clustering.inertia,
        silhouette,
        davies_bouldin
    );

    Ok(FitReport {
        table: ClusterTable { rows },
        silhouette,
        davies_bouldin,
        n_components: pca.n_components(),
        explained_variance: pca.explained_variance(),
        inertia: clustering.inertia,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_groups() -> EmbeddingStore {
        let mut store = EmbeddingStore::new();
        for group in 0..2 {
            for i in 0..5 {
                let base = group as f32 * 10.0;
                let jitter = i as f32 * 0.1;
                store
                    .insert(
                        format!("song{}{} by band{}.wav", group, i, group),
                        vec![base + jitter, base - jitter, base, 1.0],
                    )
                    .unwrap();
            }
        }
        store
    }

    #[test]
    fn test_fit_builds_table_in_store_order() {
        let config = FitConfig {
            n_clusters: 2,
            ..Default::default()
        };
        let report = run_fit(&store_with_groups(), &config).unwrap();

        assert_eq!(report.table.len(), 10);
        assert_eq!(report.table.rows[0].cover, "song00 by band0.png");
        assert_eq!(report.table.rows[0].title, "Song00 by Band0");

        let first = report.table.rows[0].cluster;
        assert!(report.table.rows[..5].iter().all(|r| r.cluster == first));
        assert!(report.table.rows[5..].iter().all(|r| r.cluster != first));
        assert!(report.silhouette > 0.9);
        assert!(report.davies_bouldin < 0.1);
    }

    #[test]
    fn test_single_component_puts_points_on_axis() {
        let config = FitConfig {
            n_clusters: 2,
            pca_variance: 0.5,
            ..Default::default()
        };
        let report = run_fit(&store_with_groups(), &config).unwrap();
        assert_eq!(report.n_components, 1);
        assert!(report.table.rows.iter().all(|r| r.y == 0.0));
    }

    #[test]
    fn test_too_few_embeddings() {
        let mut store = EmbeddingStore::new();
        store.insert("a.wav", vec![1.0, 2.0]).unwrap();
        store.insert("b.wav", vec![2.0, 1.0]).unwrap();
        let err = run_fit(&store, &FitConfig::default()).unwrap_err();
        assert!(matches!(err, ClusterError::NotEnoughSamples { needed: 4, found: 2 }));
    }
}
