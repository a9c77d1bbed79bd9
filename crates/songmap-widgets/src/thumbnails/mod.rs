//! Cover thumbnails for the scatter plot
//!
//! - [`raster`]: circular, ring-outlined thumbnails at each zoom level
//! - [`cache`]: rendered levels per cover with nearest-zoom lookup
//! - [`loader`]: background rendering with progress events

pub mod cache;
pub mod loader;
pub mod raster;

pub use cache::{CoverThumbnails, ThumbnailCache, ThumbnailLevel};
pub use loader::{progress_percent, ThumbnailEvent, ThumbnailLoader};
pub use raster::{render_levels, render_thumbnail, thumbnail_size, Thumbnail};
