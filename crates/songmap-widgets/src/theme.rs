//! Plot colours and the cluster palette

use iced::Color;
use songmap_core::config::{parse_hex_color, ClusterLabel};

pub const BACKGROUND: Color = Color::WHITE;
/// Tk "lightgray"
pub const GRID_COLOR: Color = Color::from_rgb(0.827, 0.827, 0.827);
/// Tk "darkgray"
pub const DOT_OUTLINE: Color = Color::from_rgb(0.663, 0.663, 0.663);
pub const TOOLTIP_BACKGROUND: Color = Color::BLACK;
pub const TOOLTIP_TEXT: Color = Color::WHITE;

/// Ring and dot colour for clusters without a configured colour
pub const FALLBACK_RGB: [u8; 3] = [255, 255, 255];

#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    pub id: i32,
    pub name: String,
    pub rgb: [u8; 3],
}

/// Names and colours of the configured clusters
#[derive(Debug, Clone, Default)]
pub struct ClusterPalette {
    entries: Vec<PaletteEntry>,
}

impl ClusterPalette {
    pub fn from_labels(labels: &[ClusterLabel]) -> Self {
        let entries = labels
            .iter()
            .map(|label| {
                let rgb = parse_hex_color(&label.color).unwrap_or_else(|| {
                    log::warn!(
                        "ClusterPalette: Invalid colour {:?} for cluster {}, using white",
                        label.color,
                        label.id
                    );
                    FALLBACK_RGB
                });
                PaletteEntry {
                    id: label.id,
                    name: label.name.clone(),
                    rgb,
                }
            })
            .collect();
        Self { entries }
    }

    fn entry(&self, id: i32) -> Option<&PaletteEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn stroke_rgb(&self, id: i32) -> [u8; 3] {
        self.entry(id).map_or(FALLBACK_RGB, |e| e.rgb)
    }

    pub fn color(&self, id: i32) -> Color {
        let [r, g, b] = self.stroke_rgb(id);
        Color::from_rgb8(r, g, b)
    }

    pub fn name(&self, id: i32) -> Option<&str> {
        self.entry(id).map(|e| e.name.as_str())
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }
}
