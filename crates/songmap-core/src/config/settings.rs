//! Configuration sections and defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::paths::default_model_dir;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SongmapConfig {
    pub paths: PathsConfig,
    pub scrape: ScrapeConfig,
    pub embed: EmbedConfig,
    pub fit: FitConfig,
    pub view: ViewConfig,
}

impl SongmapConfig {
    /// Clamp every section to its supported range
    pub fn validate(&mut self) {
        self.scrape.validate();
        self.embed.validate();
        self.fit.validate();
        self.view.validate();
    }
}

/// File locations, relative to the workspace unless absolute
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Downloaded audio, one file per track
    pub songs_dir: PathBuf,
    /// Downloaded cover art, one PNG per track
    pub covers_dir: PathBuf,
    /// name → embedding vector (JSON)
    pub embeddings_file: PathBuf,
    /// Fitted cluster table (JSON)
    pub clusters_file: PathBuf,
    /// Tracks to scrape (YAML list of name/artist/uri)
    pub tracklist_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            songs_dir: PathBuf::from("songs"),
            covers_dir: PathBuf::from("covers"),
            embeddings_file: PathBuf::from("files").join("embeddings.json"),
            clusters_file: PathBuf::from("song_clusters.json"),
            tracklist_file: PathBuf::from("tracks.yaml"),
        }
    }
}

/// `PathsConfig` with every entry made absolute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub songs_dir: PathBuf,
    pub covers_dir: PathBuf,
    pub embeddings_file: PathBuf,
    pub clusters_file: PathBuf,
    pub tracklist_file: PathBuf,
}

impl PathsConfig {
    /// Resolve relative entries against the workspace directory
    pub fn resolve(&self, workspace: &Path) -> ResolvedPaths {
        let join = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                workspace.join(p)
            }
        };
        ResolvedPaths {
            songs_dir: join(&self.songs_dir),
            covers_dir: join(&self.covers_dir),
            embeddings_file: join(&self.embeddings_file),
            clusters_file: join(&self.clusters_file),
            tracklist_file: join(&self.tracklist_file),
        }
    }
}

/// Scraper settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Page that converts a track URL into an audio download
    pub song_site: String,
    /// Page that resolves a track URL into its cover image
    pub cover_site: String,
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    /// How long to wait for each page element before giving up
    pub wait_timeout_secs: u64,
    /// Sent with every direct file download
    pub user_agent: String,
    /// Don't re-download files that already exist
    pub skip_existing: bool,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            song_site: String::from("https://spotidown.app/"),
            cover_site: String::from("https://www.spotifycover.art/"),
            headless: true,
            window_width: 1920,
            window_height: 1080,
            wait_timeout_secs: 15,
            user_agent: String::from("Mozilla/5.0"),
            skip_existing: true,
        }
    }
}

impl ScrapeConfig {
    pub fn validate(&mut self) {
        self.wait_timeout_secs = self.wait_timeout_secs.clamp(1, 300);
        self.window_width = self.window_width.max(320);
        self.window_height = self.window_height.max(240);
    }
}

/// Embedding step settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    /// Parallel decode/preprocessing workers (1-16)
    pub workers: u8,
    /// Keep embeddings already present in the store
    pub skip_existing: bool,
    /// Override for the ONNX model cache directory
    pub model_dir: Option<PathBuf>,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            skip_existing: true,
            model_dir: None,
        }
    }
}

impl EmbedConfig {
    pub fn validate(&mut self) {
        self.workers = self.workers.clamp(1, 16);
    }

    /// Model cache directory, falling back to the platform cache dir
    pub fn model_dir(&self) -> PathBuf {
        self.model_dir.clone().unwrap_or_else(default_model_dir)
    }
}

/// Cluster fitting parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Fraction of variance the PCA projection must explain (0, 1]
    pub pca_variance: f64,
    /// Number of k-means clusters
    pub n_clusters: usize,
    /// RNG seed for k-means++ initialisation
    pub seed: u64,
    /// Independent k-means runs; the lowest inertia wins
    pub n_init: usize,
    pub max_iter: usize,
    /// Convergence threshold relative to the mean feature variance
    pub tolerance: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            pca_variance: 0.58,
            n_clusters: 4,
            seed: 42,
            n_init: 10,
            max_iter: 300,
            tolerance: 1e-4,
        }
    }
}

impl FitConfig {
    pub fn validate(&mut self) {
        if !(self.pca_variance > 0.0) {
            self.pca_variance = FitConfig::default().pca_variance;
        }
        self.pca_variance = self.pca_variance.min(1.0);
        self.n_clusters = self.n_clusters.max(1);
        self.n_init = self.n_init.clamp(1, 100);
        self.max_iter = self.max_iter.max(1);
        if !(self.tolerance >= 0.0) {
            self.tolerance = FitConfig::default().tolerance;
        }
    }
}

/// A named cluster with its display colour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterLabel {
    pub id: i32,
    pub name: String,
    /// `#RRGGBB`
    pub color: String,
}

impl ClusterLabel {
    fn new(id: i32, name: &str, color: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

/// Viewer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Zoom level the plot opens at
    pub initial_zoom: f32,
    /// Zoom scales a thumbnail is pre-rendered for
    pub zoom_levels: Vec<f32>,
    /// Thumbnail edge length in pixels at zoom 1.0
    pub base_size: u32,
    /// Thumbnail rasterizer threads
    pub loader_threads: usize,
    /// Plot margin in pixels
    pub margin: f32,
    /// Background grid spacing in pixels
    pub grid_spacing: f32,
    /// Hover hit radius in pixels
    pub hover_radius: f32,
    /// How long "Ready" stays visible after loading
    pub status_linger_ms: u64,
    pub clusters: Vec<ClusterLabel>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            initial_zoom: 0.6,
            zoom_levels: vec![0.25, 0.5, 0.75, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0],
            base_size: 16,
            loader_threads: 8,
            margin: 50.0,
            grid_spacing: 100.0,
            hover_radius: 20.0,
            status_linger_ms: 3000,
            clusters: vec![
                ClusterLabel::new(0, "Classic", "#FFA500"),
                ClusterLabel::new(1, "Phonk", "#BE3B3B"),
                ClusterLabel::new(2, "Casual Pop", "#5656C1"),
                ClusterLabel::new(3, "Energetic Pop", "#2B7D2B"),
            ],
        }
    }
}

impl ViewConfig {
    pub fn validate(&mut self) {
        self.zoom_levels.retain(|z| z.is_finite() && *z > 0.0);
        if self.zoom_levels.is_empty() {
            self.zoom_levels = ViewConfig::default().zoom_levels;
        }
        if !(self.initial_zoom > 0.0) {
            self.initial_zoom = ViewConfig::default().initial_zoom;
        }
        self.base_size = self.base_size.max(1);
        self.loader_threads = self.loader_threads.clamp(1, 32);
        self.grid_spacing = self.grid_spacing.max(10.0);
        self.hover_radius = self.hover_radius.max(0.0);
        self.margin = self.margin.max(0.0);
    }
}

/// Parse `#RRGGBB` (the `#` is optional) into RGB bytes
pub fn parse_hex_color(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SongmapConfig::default();
        assert_eq!(config.fit.pca_variance, 0.58);
        assert_eq!(config.fit.n_clusters, 4);
        assert_eq!(config.fit.seed, 42);
        assert_eq!(config.view.initial_zoom, 0.6);
        assert_eq!(config.view.zoom_levels.len(), 10);
        assert_eq!(config.view.loader_threads, 8);
        assert_eq!(config.scrape.wait_timeout_secs, 15);
    }

    #[test]
    fn test_default_cluster_labels() {
        let labels = ViewConfig::default().clusters;
        let names: Vec<&str> = labels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Classic", "Phonk", "Casual Pop", "Energetic Pop"]);
        assert_eq!(labels[1].color, "#BE3B3B");
    }

    #[test]
    fn test_fit_validation_clamps() {
        let mut fit = FitConfig {
            pca_variance: 1.7,
            n_clusters: 0,
            n_init: 0,
            max_iter: 0,
            tolerance: f64::NAN,
            ..Default::default()
        };
        fit.validate();
        assert_eq!(fit.pca_variance, 1.0);
        assert_eq!(fit.n_clusters, 1);
        assert_eq!(fit.n_init, 1);
        assert_eq!(fit.max_iter, 1);
        assert_eq!(fit.tolerance, 1e-4);

        let mut negative = FitConfig {
            pca_variance: -0.2,
            ..Default::default()
        };
        negative.validate();
        assert_eq!(negative.pca_variance, 0.58);
    }

    #[test]
    fn test_view_validation_restores_zoom_levels() {
        let mut view = ViewConfig {
            zoom_levels: vec![0.0, -1.0, f32::NAN],
            loader_threads: 0,
            ..Default::default()
        };
        view.validate();
        assert_eq!(view.zoom_levels, ViewConfig::default().zoom_levels);
        assert_eq!(view.loader_threads, 1);
    }

    #[test]
    fn test_embed_workers_clamped() {
        let mut embed = EmbedConfig {
            workers: 64,
            ..Default::default()
        };
        embed.validate();
        assert_eq!(embed.workers, 16);
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let paths = PathsConfig {
            covers_dir: PathBuf::from("/srv/covers"),
            ..Default::default()
        };
        let resolved = paths.resolve(Path::new("/home/me/songmap"));
        assert_eq!(resolved.songs_dir, PathBuf::from("/home/me/songmap/songs"));
        assert_eq!(resolved.covers_dir, PathBuf::from("/srv/covers"));
        assert_eq!(
            resolved.embeddings_file,
            PathBuf::from("/home/me/songmap/files/embeddings.json")
        );
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FFA500"), Some([255, 165, 0]));
        assert_eq!(parse_hex_color("2b7d2b"), Some([43, 125, 43]));
        assert_eq!(parse_hex_color("#FFF"), None);
        assert_eq!(parse_hex_color("#GG0000"), None);
        assert_eq!(parse_hex_color("#ÿÿÿ"), None);
    }
}
