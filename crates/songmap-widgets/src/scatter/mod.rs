//! Cluster scatter plot
//!
//! Pure pieces (`transform`, `hit`, `filter`) are kept apart from the
//! canvas so they can be tested without a renderer.

mod canvas;
mod filter;
mod hit;
mod transform;
mod view;

pub use canvas::{dot_radius, plotted_points, PlotStyle, ScatterCanvas, ScatterInteraction, ScatterPlot};
pub use filter::ClusterFilter;
pub use hit::{hit_test, PlottedPoint};
pub use transform::{PlotTransform, Viewport};
pub use view::scatter_plot;
