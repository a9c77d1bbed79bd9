//! YAML configuration loading and saving
//!
//! Generic over the configuration type so the pipeline binaries and the
//! viewer share one code path.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::paths::{default_config_path, default_workspace_path};
use super::settings::SongmapConfig;

/// Read a workspace's `songmap.yaml` (or any YAML config type)
///
/// All four songmap binaries start from this. Sections missing from the
/// file take their `#[serde(default)]` values; a missing or unparsable file
/// falls back to `T::default()` with a warning. Range checks are left to
/// the caller, see [`open_workspace`].
pub fn load_config<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        log::info!("load_config: No config at {:?}, using defaults", path);
        return T::default();
    }

    match read_yaml(path) {
        Ok(config) => {
            log::info!("load_config: Loaded {:?}", path);
            config
        }
        Err(e) => {
            log::warn!("load_config: {:#}, using defaults", e);
            T::default()
        }
    }
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_yaml::from_str(&contents).with_context(|| format!("Failed to parse {:?}", path))
}

/// Save configuration to a YAML file, creating parent directories
pub fn save_config<T>(config: &T, path: &Path) -> Result<()>
where
    T: Serialize,
{
    log::info!("save_config: Saving to {:?}", path);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;

    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    Ok(())
}

/// Resolve workspace and config file from optional CLI overrides, then load
/// and validate the config
///
/// Returns the workspace directory and its configuration.
pub fn open_workspace(
    workspace: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> (PathBuf, SongmapConfig) {
    let workspace = workspace.unwrap_or_else(default_workspace_path);
    let config_path = config_path.unwrap_or_else(|| default_config_path(&workspace));

    let mut config: SongmapConfig = load_config(&config_path);
    config.validate();
    (workspace, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_nonexistent_returns_default() {
        let config: SongmapConfig = load_config(Path::new("/nonexistent/songmap.yaml"));
        assert_eq!(config.fit.n_clusters, 4);
    }

    #[test]
    fn test_load_malformed_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("songmap.yaml");
        std::fs::write(&path, "fit: [this is: not a map").unwrap();

        let config: SongmapConfig = load_config(&path);
        assert_eq!(config.fit.seed, 42);
    }

    #[test]
    fn test_unreadable_path_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("songmap.yaml");
        std::fs::create_dir(&path).unwrap();

        let config: SongmapConfig = load_config(&path);
        assert_eq!(config.view.loader_threads, 8);
    }

    #[test]
    fn test_save_creates_parent_and_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("songmap.yaml");

        let mut config = SongmapConfig::default();
        config.fit.n_clusters = 6;
        config.view.loader_threads = 2;

        save_config(&config, &path).unwrap();
        let loaded: SongmapConfig = load_config(&path);

        assert_eq!(loaded.fit.n_clusters, 6);
        assert_eq!(loaded.view.loader_threads, 2);
    }

    #[test]
    fn test_open_workspace_reads_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("songmap.yaml"),
            "embed:\n  workers: 200\nfit:\n  n_clusters: 5\n",
        )
        .unwrap();

        let (workspace, config) = open_workspace(Some(dir.path().to_path_buf()), None);
        assert_eq!(workspace, dir.path());
        assert_eq!(config.fit.n_clusters, 5);
        assert_eq!(config.embed.workers, 16);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("songmap.yaml");
        std::fs::write(&path, "fit:\n  n_clusters: 3\n").unwrap();

        let config: SongmapConfig = load_config(&path);
        assert_eq!(config.fit.n_clusters, 3);
        assert_eq!(config.fit.pca_variance, 0.58);
        assert_eq!(config.view.clusters.len(), 4);
    }
}
