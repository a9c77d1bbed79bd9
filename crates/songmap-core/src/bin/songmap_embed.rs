//! songmap-embed: compute one embedding per downloaded song

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use songmap_core::config::open_workspace;
use songmap_core::embedding::{
    run_embedding, EmbedProgress, EmbedRequest, EmbeddingModel, ModelManager,
};

#[derive(Parser)]
#[command(name = "songmap-embed", about = "Embed every song in the workspace")]
struct Args {
    /// Workspace directory (default: ~/Music/songmap)
    #[arg(long)]
    workspace: Option<PathBuf>,

    /// Config file (default: <workspace>/songmap.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Parallel decode workers, overrides the config
    #[arg(long)]
    workers: Option<u8>,

    /// Re-embed songs already in the store
    #[arg(long)]
    force: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let (workspace, config) = open_workspace(args.workspace, args.config);
    let paths = config.paths.resolve(&workspace);

    let model_path = ModelManager::new(config.embed.model_dir())
        .ensure_model()
        .context("Embedding model unavailable")?;
    let model = EmbeddingModel::load(&model_path)?;

    let request = EmbedRequest {
        songs_dir: paths.songs_dir.clone(),
        store_path: paths.embeddings_file.clone(),
        workers: args.workers.unwrap_or(config.embed.workers),
        skip_existing: config.embed.skip_existing && !args.force,
        embedder: model,
        cancel: Arc::new(AtomicBool::new(false)),
    };

    let (progress_tx, progress_rx) = mpsc::channel();
    let worker = thread::Builder::new()
        .name("embed-batch".into())
        .spawn(move || run_embedding(request, progress_tx))
        .context("Failed to spawn embedding thread")?;

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{elapsed_precise} [{bar:30.green/blue}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    for event in progress_rx {
        match event {
            EmbedProgress::Started { total } => bar.set_length(total as u64),
            EmbedProgress::TrackCompleted { name, error, .. } => {
                if let Some(error) = error {
                    bar.println(format!("failed: {} ({})", name, error));
                }
                bar.set_message(name);
                bar.inc(1);
            }
            EmbedProgress::Finished { .. } => bar.finish_and_clear(),
        }
    }

    let summary = worker
        .join()
        .map_err(|_| anyhow!("Embedding thread panicked"))??;

    println!(
        "Embedded {} songs ({} skipped, {} failed) -> {}",
        summary.embedded,
        summary.skipped,
        summary.failed,
        paths.embeddings_file.display()
    );
    Ok(())
}
