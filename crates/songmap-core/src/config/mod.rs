//! Configuration for the songmap pipeline
//!
//! One `songmap.yaml` per workspace holds every step's settings:
//!
//! - `paths`: where songs, covers, embeddings and the cluster table live
//! - `scrape`: browser and site settings for `songmap-scrape`
//! - `embed`: worker count and model cache for `songmap-embed`
//! - `fit`: PCA / k-means parameters for `songmap-fit`
//! - `view`: zoom levels, thumbnail sizes and cluster names for `songmap-view`
//!
//! ```ignore
//! use songmap_core::config::{load_config, default_config_path, SongmapConfig};
//!
//! let mut config: SongmapConfig = load_config(&default_config_path(&workspace));
//! config.validate();
//! let paths = config.paths.resolve(&workspace);
//! ```

mod io;
mod paths;
mod settings;

pub use io::{load_config, open_workspace, save_config};
pub use paths::{default_config_path, default_model_dir, default_workspace_path, CONFIG_FILE_NAME};
pub use settings::{
    parse_hex_color, ClusterLabel, EmbedConfig, FitConfig, PathsConfig, ResolvedPaths,
    ScrapeConfig, SongmapConfig, ViewConfig,
};
