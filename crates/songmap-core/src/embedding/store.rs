//! Persistent `audio file name → embedding` map

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::error::{EmbedError, Result};

/// Embeddings keyed by audio file name (`Song by Artist.wav`)
///
/// Iteration is sorted by name, which fixes the row order of the fit step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddingStore {
    entries: BTreeMap<String, Vec<f32>>,
}

impl EmbeddingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from JSON; a missing file is an empty store
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("EmbeddingStore::load: {:?} doesn't exist, starting empty", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let entries: BTreeMap<String, Vec<f32>> =
            serde_json::from_str(&contents).map_err(|e| EmbedError::StoreFormat {
                path: path.to_path_buf(),
                source: e,
            })?;

        let mut store = Self::default();
        for (name, vector) in entries {
            store.insert(name, vector)?;
        }
        log::info!("EmbeddingStore::load: {} embeddings from {:?}", store.len(), path);
        Ok(store)
    }

    /// Write JSON through a temp file so a crash never truncates the store
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string(&self.entries).map_err(|e| EmbedError::StoreFormat {
            path: path.to_path_buf(),
            source: e,
        })?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, path)?;

        log::info!("EmbeddingStore::save: {} embeddings to {:?}", self.len(), path);
        Ok(())
    }

    /// Insert or replace; every vector must share one dimension and be finite
    ///
    /// JSON has no NaN, so a non-finite value would be saved as `null` and
    /// make the whole file unreadable.
    pub fn insert(&mut self, name: impl Into<String>, vector: Vec<f32>) -> Result<()> {
        let name = name.into();
        check_finite(&name, &vector)?;
        if let Some(expected) = self.dimension() {
            let replacing_only = self.entries.len() == 1 && self.entries.contains_key(&name);
            if vector.len() != expected && !replacing_only {
                return Err(EmbedError::InconsistentDimension {
                    name,
                    expected,
                    found: vector.len(),
                });
            }
        }
        self.entries.insert(name, vector);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&[f32]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Shared vector length, `None` when empty
    pub fn dimension(&self) -> Option<usize> {
        self.entries.values().next().map(Vec::len)
    }
}

/// `NonFiniteEmbedding` unless every component is finite
pub fn check_finite(name: &str, vector: &[f32]) -> Result<()> {
    if vector.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(EmbedError::NonFiniteEmbedding {
            name: name.to_string(),
        })
    }
}
