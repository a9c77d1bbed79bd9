//! Shared UI widgets for the songmap viewer
//!
//! ## Architecture (iced 0.14 patterns)
//!
//! - **State structs**: plain data (`Viewport`, `ThumbnailCache`, `ClusterFilter`)
//! - **View functions**: take state + callbacks, return `Element<Message>`
//! - **Canvas Programs**: custom drawing and event-to-callback translation
//!
//! ## Contents
//!
//! - [`scatter`]: the cluster map canvas with pan, zoom and hover titles
//! - [`thumbnails`]: circular cover thumbnails rendered off the UI thread
//! - [`theme`]: cluster palette and plot colours
//! - [`mpsc_subscription`]: bridge from worker channels to iced subscriptions

pub mod scatter;
pub mod subscription;
pub mod theme;
pub mod thumbnails;

pub use scatter::{scatter_plot, ClusterFilter, PlotStyle, PlotTransform, ScatterPlot, Viewport};
pub use subscription::mpsc_subscription;
pub use theme::ClusterPalette;
pub use thumbnails::{progress_percent, ThumbnailCache, ThumbnailEvent, ThumbnailLoader};
