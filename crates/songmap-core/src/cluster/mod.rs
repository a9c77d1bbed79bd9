//! Clustering of song embeddings
//!
//! [`run_fit`] chains [`MinMaxScaler`], [`Pca`] and [`KMeans`] and produces
//! the [`ClusterTable`] the viewer plots.

mod error;
mod fit;
pub mod kmeans;
pub mod metrics;
pub mod pca;
pub mod scale;
mod table;

pub use error::{ClusterError, Result, TableError};
pub use fit::{run_fit, FitReport};
pub use kmeans::{KMeans, KMeansResult};
pub use metrics::{davies_bouldin_score, silhouette_score, NOISE_LABEL};
pub use pca::Pca;
pub use scale::MinMaxScaler;
pub use table::{cover_name_for, smart_title, title_for, ClusterRow, ClusterTable};
