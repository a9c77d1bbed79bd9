//! Embedding error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors from decoding, preprocessing, inference and the embedding store
#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("Failed to read audio file: {path}")]
    AudioReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("No samples decoded from {0}")]
    EmptyAudio(PathBuf),

    #[error("Audio too short: {samples} samples, need at least {needed}")]
    AudioTooShort { samples: usize, needed: usize },

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Model download failed: {0}")]
    ModelDownloadFailed(String),

    #[error("Failed to load model: {0}")]
    ModelLoadFailed(String),

    #[error("Inference failed: {0}")]
    InferenceFailed(String),

    #[error("Embedding for {name} has {found} dimensions, store holds {expected}")]
    InconsistentDimension {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Embedding for {name} contains NaN or infinite values")]
    NonFiniteEmbedding { name: String },

    #[error("Embedding store error: {path}")]
    StoreFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cancelled")]
    Cancelled,

    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EmbedError>;
