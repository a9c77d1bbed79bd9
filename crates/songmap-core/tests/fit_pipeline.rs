//! Store on disk → fit → table on disk, as songmap-fit runs it

use songmap_core::cluster::{run_fit, ClusterTable};
use songmap_core::config::{open_workspace, save_config, SongmapConfig};
use songmap_core::embedding::EmbeddingStore;

/// Three well separated groups in 8 dimensions
fn grouped_store() -> EmbeddingStore {
    let mut store = EmbeddingStore::new();
    for group in 0..3 {
        for i in 0..6 {
            let vector: Vec<f32> = (0..8)
                .map(|d| {
                    let centre = if d % 3 == group { 5.0 } else { 0.0 };
                    centre + ((i * 7 + d) % 5) as f32 * 0.05
                })
                .collect();
            store
                .insert(format!("track{}{} by artist{}.wav", group, i, group), vector)
                .unwrap();
        }
    }
    store
}

#[test]
fn fit_from_workspace_files() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = dir.path();

    let mut config = SongmapConfig::default();
    config.fit.n_clusters = 3;
    config.fit.pca_variance = 0.9;
    save_config(&config, &workspace.join("songmap.yaml")).unwrap();

    let (workspace, config) = open_workspace(Some(workspace.to_path_buf()), None);
    let paths = config.paths.resolve(&workspace);

    grouped_store().save(&paths.embeddings_file).unwrap();
    let store = EmbeddingStore::load(&paths.embeddings_file).unwrap();
    assert_eq!(store.len(), 18);

    let report = run_fit(&store, &config.fit).unwrap();
    assert!(report.n_components >= 2);
    assert!(report.explained_variance > 0.9);
    assert!(report.silhouette > 0.8, "silhouette {}", report.silhouette);
    assert_eq!(report.table.cluster_ids(), vec![0, 1, 2]);

    for group in report.table.rows.chunks(6) {
        assert!(group.iter().all(|r| r.cluster == group[0].cluster));
    }

    report.table.save(&paths.clusters_file).unwrap();
    let table = ClusterTable::load(&paths.clusters_file).unwrap();
    assert_eq!(table, report.table);
    assert_eq!(table.rows[0].cover, "track00 by artist0.png");
    assert_eq!(table.rows[0].title, "Track00 by Artist0");
}

#[test]
fn fit_is_reproducible() {
    let config = SongmapConfig::default();
    let mut fit = config.fit.clone();
    fit.n_clusters = 3;

    let store = grouped_store();
    let a = run_fit(&store, &fit).unwrap();
    let b = run_fit(&store, &fit).unwrap();
    assert_eq!(a.table, b.table);
}
