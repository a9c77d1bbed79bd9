//! The cluster table: one plotted row per song

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::TableError;
use crate::embedding::service::AUDIO_EXTENSIONS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterRow {
    /// Cover image file name (`Song by Artist.png`)
    pub cover: String,
    pub x: f64,
    pub y: f64,
    pub cluster: i32,
    /// Display title (`Song by Artist`)
    pub title: String,
}

impl ClusterRow {
    /// Build a row from an audio file name, deriving cover and title
    pub fn for_audio(audio_name: &str, x: f64, y: f64, cluster: i32) -> Self {
        let cover = cover_name_for(audio_name);
        let title = title_for(&cover);
        Self {
            cover,
            x,
            y,
            cluster,
            title,
        }
    }
}

/// Rows in fit order, stored as a JSON array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterTable {
    pub rows: Vec<ClusterRow>,
}

impl ClusterTable {
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let contents = fs::read_to_string(path).map_err(|e| TableError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let table: ClusterTable = serde_json::from_str(&contents).map_err(|e| TableError::Format {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::info!("ClusterTable::load: {} rows from {:?}", table.rows.len(), path);
        Ok(table)
    }

    pub fn save(&self, path: &Path) -> Result<(), TableError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("ClusterTable::save: {} rows to {:?}", self.rows.len(), path);
        Ok(())
    }

    /// Distinct cluster ids, sorted
    pub fn cluster_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.rows.iter().map(|r| r.cluster).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// `Song by Artist.mp3` → `Song by Artist.png`
///
/// Only a known audio extension is replaced; dots inside the title stay.
pub fn cover_name_for(audio_name: &str) -> String {
    let stem = match audio_name.rsplit_once('.') {
        Some((stem, ext)) if AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) => stem,
        _ => audio_name,
    };
    format!("{}.png", stem)
}

/// `song by artist.png` → `Song by Artist`
pub fn title_for(cover: &str) -> String {
    smart_title(cover.strip_suffix(".png").unwrap_or(cover))
}

/// Capitalise every word except `by`
pub fn smart_title(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            if word.eq_ignore_ascii_case("by") {
                return "by".to_string();
            }
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
