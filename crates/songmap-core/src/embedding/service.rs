//! Batch embedding of a songs directory
//!
//! Decoding and spectrogram computation run in parallel on a rayon pool;
//! inference is serialised through a `Mutex` around the model. Results are
//! collected in memory and the store is written once at the end, so an
//! interrupted run never leaves a half-written store behind.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use rayon::prelude::*;

use super::error::{EmbedError, Result};
use super::inference::Embedder;
use super::preprocessing::compute_mel_spectrogram;
use super::store::{check_finite, EmbeddingStore};
use crate::audio::decode_audio;

/// File extensions picked up from the songs directory
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg", "m4a"];

/// Progress updates sent while embedding
#[derive(Debug, Clone)]
pub enum EmbedProgress {
    /// Work list built; `total` excludes skipped files
    Started { total: usize },
    /// One file finished, successfully or not
    TrackCompleted {
        name: String,
        index: usize,
        total: usize,
        error: Option<String>,
    },
    /// Store saved
    Finished { summary: EmbedSummary },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmbedSummary {
    pub embedded: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Everything one embedding run needs
pub struct EmbedRequest<E: Embedder> {
    pub songs_dir: PathBuf,
    pub store_path: PathBuf,
    /// Parallel decode workers (clamped to 1-16)
    pub workers: u8,
    pub skip_existing: bool,
    pub embedder: E,
    /// Set to stop scheduling new files; finished ones are still saved
    pub cancel: Arc<AtomicBool>,
}

/// Audio files in `dir`, sorted by file name
pub fn list_audio_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(|e| AUDIO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Embed every new audio file and update the store
pub fn run_embedding<E: Embedder>(
    request: EmbedRequest<E>,
    progress_tx: Sender<EmbedProgress>,
) -> Result<EmbedSummary> {
    let EmbedRequest {
        songs_dir,
        store_path,
        workers,
        skip_existing,
        embedder,
        cancel,
    } = request;

    let mut store = EmbeddingStore::load(&store_path)?;
    let files = list_audio_files(&songs_dir)?;

    let mut summary = EmbedSummary::default();
    let work: Vec<(String, PathBuf)> = files
        .into_iter()
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().into_owned();
            if skip_existing && store.contains(&name) {
                summary.skipped += 1;
                None
            } else {
                Some((name, path))
            }
        })
        .collect();

    let total = work.len();
    log::info!(
        "run_embedding: {} files to embed, {} already in store",
        total,
        summary.skipped
    );
    let _ = progress_tx.send(EmbedProgress::Started { total });

    let num_workers = workers.clamp(1, 16) as usize;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_workers)
        .build()
        .map_err(|e| EmbedError::WorkerPool(e.to_string()))?;

    let embedder = Mutex::new(embedder);

    let results: Vec<(String, Result<Vec<f32>>)> = pool.install(|| {
        work.par_iter()
            .enumerate()
            .map_with(progress_tx.clone(), |tx, (index, (name, path))| {
                let result = if cancel.load(Ordering::Relaxed) {
                    Err(EmbedError::Cancelled)
                } else {
                    embed_file(name, path, &embedder)
                };

                if let Err(e) = &result {
                    log::warn!("run_embedding: {} failed: {}", name, e);
                }
                let _ = tx.send(EmbedProgress::TrackCompleted {
                    name: name.clone(),
                    index,
                    total,
                    error: result.as_ref().err().map(|e| e.to_string()),
                });

                (name.clone(), result)
            })
            .collect()
    });

    for (name, result) in results {
        match result.and_then(|vector| store.insert(name.as_str(), vector)) {
            Ok(()) => summary.embedded += 1,
            Err(EmbedError::InconsistentDimension { expected, found, .. }) => {
                log::warn!(
                    "run_embedding: Not storing {}: {} dimensions, store holds {}",
                    name,
                    found,
                    expected
                );
                summary.failed += 1;
            }
            Err(_) => summary.failed += 1,
        }
    }

    store.save(&store_path)?;

    log::info!(
        "run_embedding: {} embedded, {} skipped, {} failed",
        summary.embedded,
        summary.skipped,
        summary.failed
    );
    let _ = progress_tx.send(EmbedProgress::Finished { summary });

    Ok(summary)
}

fn embed_file<E: Embedder>(name: &str, path: &Path, embedder: &Mutex<E>) -> Result<Vec<f32>> {
    let audio = decode_audio(path)?;
    let mel = compute_mel_spectrogram(&audio.samples, audio.sample_rate)?;

    let vector = {
        let mut model = embedder
            .lock()
            .map_err(|_| EmbedError::InferenceFailed("Model lock poisoned".to_string()))?;
        model.embed(&mel)?
    };
    check_finite(name, &vector)?;
    Ok(vector)
}
