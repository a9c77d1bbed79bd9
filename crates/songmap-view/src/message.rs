//! Application messages

use songmap_widgets::{ClusterFilter, ThumbnailEvent};

#[derive(Debug, Clone)]
pub enum Message {
    /// Progress from the background thumbnail loader
    Thumbnail(ThumbnailEvent),
    /// Drag delta in pixels
    Pan(f32, f32),
    /// Wheel notch, `true` for scroll up
    Zoom(bool),
    SelectFilter(ClusterFilter),
    /// Linger timer for the "Ready" status ran out
    HideStatus,
}
