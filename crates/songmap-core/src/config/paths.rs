//! Standard locations for the songmap workspace

use std::path::PathBuf;

/// Config file name inside a workspace
pub const CONFIG_FILE_NAME: &str = "songmap.yaml";

/// Get the default workspace path
///
/// Returns: `~/Music/songmap`
pub fn default_workspace_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Music")
        .join("songmap")
}

/// Get the config file path for a workspace
///
/// Returns: `{workspace}/songmap.yaml`
pub fn default_config_path(workspace: &std::path::Path) -> PathBuf {
    workspace.join(CONFIG_FILE_NAME)
}

/// Get the default ONNX model cache directory
///
/// Returns: `~/.cache/songmap/models` (platform cache dir)
pub fn default_model_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("songmap")
        .join("models")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_path_ends_with_songmap() {
        assert!(default_workspace_path().ends_with("songmap"));
    }

    #[test]
    fn test_config_path_in_workspace() {
        let path = default_config_path(std::path::Path::new("/tmp/ws"));
        assert_eq!(path, PathBuf::from("/tmp/ws/songmap.yaml"));
    }
}
