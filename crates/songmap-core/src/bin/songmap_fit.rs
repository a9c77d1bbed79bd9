//! songmap-fit: cluster the stored embeddings and write the plot table

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use songmap_core::cluster::run_fit;
use songmap_core::config::open_workspace;
use songmap_core::embedding::EmbeddingStore;

#[derive(Parser)]
#[command(name = "songmap-fit", about = "Cluster song embeddings into a 2D map")]
struct Args {
    /// Workspace directory (default: ~/Music/songmap)
    #[arg(long)]
    workspace: Option<PathBuf>,

    /// Config file (default: <workspace>/songmap.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of clusters, overrides the config
    #[arg(long)]
    clusters: Option<usize>,

    /// Write the table here instead of the configured path
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let (workspace, mut config) = open_workspace(args.workspace, args.config);
    if let Some(clusters) = args.clusters {
        config.fit.n_clusters = clusters;
        config.fit.validate();
    }
    let paths = config.paths.resolve(&workspace);

    let store = EmbeddingStore::load(&paths.embeddings_file)
        .with_context(|| format!("Failed to load embeddings from {:?}", paths.embeddings_file))?;
    let report = run_fit(&store, &config.fit)?;

    println!("Silhouette Score: {:.4}", report.silhouette);
    println!("Davies-Bouldin Score: {:.4}", report.davies_bouldin);
    println!(
        "PCA components: {} ({:.1}% variance)",
        report.n_components,
        report.explained_variance * 100.0
    );

    let output = args.output.unwrap_or(paths.clusters_file);
    report.table.save(&output)?;
    println!("Wrote {} rows to {}", report.table.len(), output.display());
    Ok(())
}
