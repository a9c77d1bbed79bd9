//! Sequential download of a whole tracklist

use std::fs;
use std::path::PathBuf;

use songmap_core::TrackRef;

use crate::browser::TrackDownloader;
use crate::error::Result;

/// Which assets to fetch per track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrapeMode {
    #[default]
    Both,
    SongsOnly,
    CoversOnly,
}

impl ScrapeMode {
    fn songs(self) -> bool {
        matches!(self, ScrapeMode::Both | ScrapeMode::SongsOnly)
    }

    fn covers(self) -> bool {
        matches!(self, ScrapeMode::Both | ScrapeMode::CoversOnly)
    }
}

#[derive(Debug, Clone)]
pub struct ScrapeDirs {
    pub songs_dir: PathBuf,
    pub covers_dir: PathBuf,
}

/// Per-asset counts for one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub songs_downloaded: usize,
    pub covers_downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// `(file stem, error)` for every failed asset
    pub failures: Vec<(String, String)>,
}

/// Download every track's assets; one failure never stops the batch
pub fn run_batch<D: TrackDownloader>(
    downloader: &D,
    tracks: &[TrackRef],
    dirs: &ScrapeDirs,
    mode: ScrapeMode,
    skip_existing: bool,
) -> Result<ScrapeSummary> {
    if mode.songs() {
        fs::create_dir_all(&dirs.songs_dir)?;
    }
    if mode.covers() {
        fs::create_dir_all(&dirs.covers_dir)?;
    }

    let mut summary = ScrapeSummary::default();
    let total = tracks.len();

    for (index, track) in tracks.iter().enumerate() {
        log::info!("run_batch: [{}/{}] {}", index + 1, total, track.file_stem());

        if mode.songs() {
            let target = dirs.songs_dir.join(track.song_file_name());
            if skip_existing && target.exists() {
                summary.skipped += 1;
            } else {
                match downloader.download_song(track, &dirs.songs_dir) {
                    Ok(_) => summary.songs_downloaded += 1,
                    Err(e) => record_failure(&mut summary, track, "song", e),
                }
            }
        }

        if mode.covers() {
            let target = dirs.covers_dir.join(track.cover_file_name());
            if skip_existing && target.exists() {
                summary.skipped += 1;
            } else {
                match downloader.download_cover(track, &dirs.covers_dir) {
                    Ok(_) => summary.covers_downloaded += 1,
                    Err(e) => record_failure(&mut summary, track, "cover", e),
                }
            }
        }
    }

    log::info!(
        "run_batch: {} songs, {} covers, {} skipped, {} failed",
        summary.songs_downloaded,
        summary.covers_downloaded,
        summary.skipped,
        summary.failed
    );
    Ok(summary)
}

fn record_failure(summary: &mut ScrapeSummary, track: &TrackRef, asset: &str, error: impl std::fmt::Display) {
    log::warn!("run_batch: {} for {} failed: {}", asset, track.file_stem(), error);
    summary.failed += 1;
    summary
        .failures
        .push((track.file_stem(), format!("{}: {}", asset, error)));
}
