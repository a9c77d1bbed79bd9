//! songmap core - shared library for the song clustering pipeline
//!
//! The pipeline runs in three offline steps followed by a viewer:
//!
//! 1. **Scrape** (`songmap-scrape`): audio + cover art per track
//! 2. **Embed** (`songmap-embed`): one averaged embedding vector per song
//! 3. **Fit** (`songmap-fit`): scale, PCA, k-means, 2D projection table
//! 4. **View** (`songmap-view`): interactive scatter plot of the table
//!
//! This crate holds everything the steps share: configuration, track naming,
//! audio decoding, the embedding model, clustering and the cluster table.

pub mod audio;
pub mod cluster;
pub mod config;
pub mod embedding;
pub mod track;

#[cfg(test)]
mod test_support;

pub use cluster::{ClusterRow, ClusterTable};
pub use config::SongmapConfig;
pub use embedding::EmbeddingStore;
pub use track::TrackRef;
