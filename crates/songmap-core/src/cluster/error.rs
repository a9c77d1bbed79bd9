//! Clustering and table error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors from scaling, PCA, k-means and the fit pipeline
#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("Not enough samples: need at least {needed}, got {found}")]
    NotEnoughSamples { needed: usize, found: usize },

    #[error("Embeddings have inconsistent dimensions: expected {expected}, row {row} has {found}")]
    RaggedInput {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Feature dimension mismatch: fitted on {expected}, got {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, ClusterError>;

/// Errors reading or writing the cluster table
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to read cluster table: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid cluster table: {path}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
