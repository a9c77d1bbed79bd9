//! Background thumbnail rendering
//!
//! A coordinating thread fans the table rows out over a rayon pool. Each
//! finished row is reported as soon as it completes, so progress counts up
//! in completion order rather than table order.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use iced::widget::image::Handle;
use rayon::prelude::*;

use songmap_core::config::ViewConfig;
use songmap_core::ClusterRow;

use super::cache::{CoverThumbnails, ThumbnailLevel};
use super::raster::render_levels;
use crate::theme::ClusterPalette;

/// Messages from the loader thread
#[derive(Debug, Clone)]
pub enum ThumbnailEvent {
    /// One row finished; `thumbnails` is `None` when its cover failed
    Loaded {
        cover: String,
        thumbnails: Option<CoverThumbnails>,
        loaded: usize,
        total: usize,
    },
    /// Every row has been reported
    Finished { total: usize, failed: usize },
}

/// Whole-number percentage of rows done (100 for an empty table)
pub fn progress_percent(loaded: usize, total: usize) -> u32 {
    if total == 0 {
        return 100;
    }
    ((loaded.min(total) * 100) / total) as u32
}

struct Job {
    cover: String,
    path: PathBuf,
    stroke: [u8; 3],
}

/// Handle to a running loader
pub struct ThumbnailLoader {
    receiver: Arc<Mutex<Receiver<ThumbnailEvent>>>,
    _handle: JoinHandle<()>,
}

impl ThumbnailLoader {
    /// Start rendering thumbnails for `rows` from covers in `covers_dir`
    pub fn spawn(
        rows: &[ClusterRow],
        covers_dir: &Path,
        config: &ViewConfig,
        palette: &ClusterPalette,
    ) -> std::io::Result<Self> {
        let jobs: Vec<Job> = rows
            .iter()
            .map(|row| Job {
                cover: row.cover.clone(),
                path: covers_dir.join(&row.cover),
                stroke: palette.stroke_rgb(row.cluster),
            })
            .collect();
        let levels = config.zoom_levels.clone();
        let base_size = config.base_size;
        let threads = config.loader_threads.max(1);

        let (tx, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("thumbnail-loader".into())
            .spawn(move || run_loader(jobs, levels, base_size, threads, tx))?;

        Ok(Self {
            receiver: Arc::new(Mutex::new(rx)),
            _handle: handle,
        })
    }

    /// Shared receiver for `mpsc_subscription`
    pub fn receiver(&self) -> Arc<Mutex<Receiver<ThumbnailEvent>>> {
        self.receiver.clone()
    }
}

fn run_loader(jobs: Vec<Job>, levels: Vec<f32>, base_size: u32, threads: usize, tx: Sender<ThumbnailEvent>) {
    let total = jobs.len();
    let loaded = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    log::info!("thumbnail-loader: Rendering {} covers on {} threads", total, threads);

    let render = |tx: &mut Sender<ThumbnailEvent>, job: &Job| {
        let thumbnails = match render_levels(&job.path, &levels, base_size, job.stroke) {
            Ok(rendered) => Some(CoverThumbnails::new(
                rendered
                    .into_iter()
                    .map(|t| ThumbnailLevel {
                        zoom: t.zoom,
                        size: t.size,
                        handle: Handle::from_rgba(t.size, t.size, t.image.into_raw()),
                    })
                    .collect(),
            )),
            Err(e) => {
                log::warn!("thumbnail-loader: {:?}: {}", job.path, e);
                failed.fetch_add(1, Ordering::Relaxed);
                None
            }
        };
        let done = loaded.fetch_add(1, Ordering::Relaxed) + 1;
        let _ = tx.send(ThumbnailEvent::Loaded {
            cover: job.cover.clone(),
            thumbnails,
            loaded: done,
            total,
        });
    };

    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(|| jobs.par_iter().for_each_with(tx.clone(), render)),
        Err(e) => {
            log::warn!("thumbnail-loader: Thread pool unavailable ({}), rendering inline", e);
            let mut tx = tx.clone();
            jobs.iter().for_each(|job| render(&mut tx, job));
        }
    }

    let failed = failed.load(Ordering::Relaxed);
    log::info!("thumbnail-loader: Done, {} of {} covers failed", failed, total);
    let _ = tx.send(ThumbnailEvent::Finished { total, failed });
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::time::Duration;

    fn row(cover: &str, cluster: i32) -> ClusterRow {
        ClusterRow {
            cover: cover.to_string(),
            x: 0.0,
            y: 0.0,
            cluster,
            title: cover.trim_end_matches(".png").to_string(),
        }
    }

    fn collect_events(loader: &ThumbnailLoader) -> Vec<ThumbnailEvent> {
        let rx = loader.receiver();
        let rx = rx.lock().unwrap();
        let mut events = Vec::new();
        loop {
            let event = rx.recv_timeout(Duration::from_secs(10)).expect("loader stalled");
            let finished = matches!(event, ThumbnailEvent::Finished { .. });
            events.push(event);
            if finished {
                return events;
            }
        }
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(0, 3), 0);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 66);
        assert_eq!(progress_percent(3, 3), 100);
        assert_eq!(progress_percent(0, 0), 100);
    }

    #[test]
    fn test_loader_reports_every_row() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.png"] {
            RgbaImage::from_pixel(20, 20, Rgba([9, 9, 9, 255]))
                .save(dir.path().join(name))
                .unwrap();
        }
        let rows = vec![row("a.png", 0), row("missing.png", 1), row("b.png", 7)];
        let config = ViewConfig {
            loader_threads: 2,
            ..Default::default()
        };
        let palette = ClusterPalette::from_labels(&config.clusters);

        let loader = ThumbnailLoader::spawn(&rows, dir.path(), &config, &palette).unwrap();
        let events = collect_events(&loader);

        assert_eq!(events.len(), 4);
        let mut counts = Vec::new();
        for event in &events[..3] {
            match event {
                ThumbnailEvent::Loaded { cover, thumbnails, loaded, total } => {
                    assert_eq!(*total, 3);
                    counts.push(*loaded);
                    if cover == "missing.png" {
                        assert!(thumbnails.is_none());
                    } else {
                        let thumbs = thumbnails.as_ref().unwrap();
                        assert_eq!(thumbs.levels().len(), config.zoom_levels.len());
                    }
                }
                other => panic!("unexpected {:?}", other),
            }
        }
        assert_eq!(counts, [1, 2, 3]);
        assert!(matches!(events[3], ThumbnailEvent::Finished { total: 3, failed: 1 }));
    }

    #[test]
    fn test_empty_table_finishes_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let config = ViewConfig::default();
        let palette = ClusterPalette::from_labels(&config.clusters);

        let loader = ThumbnailLoader::spawn(&[], dir.path(), &config, &palette).unwrap();
        let events = collect_events(&loader);
        assert!(matches!(events[..], [ThumbnailEvent::Finished { total: 0, failed: 0 }]));
    }
}
