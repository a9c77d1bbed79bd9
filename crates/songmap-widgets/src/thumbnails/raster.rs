//! Circular cover thumbnails with a cluster-coloured ring

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageResult, Rgba, RgbaImage};

/// Smallest thumbnail edge in pixels
pub const MIN_THUMBNAIL_SIZE: u32 = 8;
/// Transparent gap between the cover and the canvas edge
const INSET: u32 = 2;
const RING_WIDTH: f32 = 4.0;

/// One rendered zoom level
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub zoom: f32,
    pub size: u32,
    pub image: RgbaImage,
}

/// Edge length of the thumbnail for `zoom`
pub fn thumbnail_size(base: u32, zoom: f32) -> u32 {
    ((base as f32 * zoom).floor().max(0.0) as u32).max(MIN_THUMBNAIL_SIZE)
}

/// Render `source` as a `size`×`size` disc outlined in `stroke`
pub fn render_thumbnail(source: &RgbaImage, size: u32, stroke: [u8; 3]) -> RgbaImage {
    let size = size.max(MIN_THUMBNAIL_SIZE);
    let inner = size - 2 * INSET;
    let cover = imageops::resize(source, inner, inner, FilterType::Lanczos3);

    let mut canvas = RgbaImage::new(size, size);

    let inner_radius = inner as f32 / 2.0;
    for (x, y, pixel) in cover.enumerate_pixels() {
        if inside_disc(x, y, inner_radius, inner_radius) {
            canvas.put_pixel(x + INSET, y + INSET, *pixel);
        }
    }

    let outer_radius = size as f32 / 2.0;
    let ring = Rgba([stroke[0], stroke[1], stroke[2], 255]);
    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        let d = distance_from_centre(x, y, outer_radius);
        if d <= outer_radius && d >= outer_radius - RING_WIDTH {
            *pixel = ring;
        }
    }

    canvas
}

/// Decode `path` once and render it at every zoom level
pub fn render_levels(path: &Path, levels: &[f32], base: u32, stroke: [u8; 3]) -> ImageResult<Vec<Thumbnail>> {
    let source = image::open(path)?.to_rgba8();
    Ok(levels
        .iter()
        .map(|&zoom| {
            let size = thumbnail_size(base, zoom);
            Thumbnail {
                zoom,
                size,
                image: render_thumbnail(&source, size, stroke),
            }
        })
        .collect())
}

fn distance_from_centre(x: u32, y: u32, radius: f32) -> f32 {
    let dx = x as f32 + 0.5 - radius;
    let dy = y as f32 + 0.5 - radius;
    (dx * dx + dy * dy).sqrt()
}

fn inside_disc(x: u32, y: u32, centre: f32, radius: f32) -> bool {
    distance_from_centre(x, y, centre) <= radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, rgb: [u8; 3]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([rgb[0], rgb[1], rgb[2], 255]))
    }

    #[test]
    fn test_thumbnail_size() {
        assert_eq!(thumbnail_size(16, 0.25), 8);
        assert_eq!(thumbnail_size(16, 0.6), 9);
        assert_eq!(thumbnail_size(16, 1.0), 16);
        assert_eq!(thumbnail_size(16, 4.0), 64);
        assert_eq!(thumbnail_size(16, 0.0), 8);
    }

    #[test]
    fn test_render_layout() {
        let thumb = render_thumbnail(&solid(50, 30, [0, 0, 255]), 32, [255, 165, 0]);
        assert_eq!(thumb.dimensions(), (32, 32));

        // Corners stay transparent
        assert_eq!(thumb.get_pixel(0, 0)[3], 0);
        assert_eq!(thumb.get_pixel(31, 31)[3], 0);
        // Ring on the outer edge, top middle
        assert_eq!(*thumb.get_pixel(16, 1), Rgba([255, 165, 0, 255]));
        // Cover in the centre
        let centre = thumb.get_pixel(16, 16);
        assert!(centre[2] >= 250 && centre[0] <= 5, "centre pixel {:?}", centre);
        assert!(centre[3] >= 250);
    }

    #[test]
    fn test_render_minimum_size() {
        let thumb = render_thumbnail(&solid(4, 4, [10, 10, 10]), 2, [0, 0, 0]);
        assert_eq!(thumb.dimensions(), (8, 8));
    }

    #[test]
    fn test_render_levels_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.png");
        solid(64, 64, [200, 10, 10]).save(&path).unwrap();

        let levels = render_levels(&path, &[0.5, 1.0, 2.0], 16, [1, 2, 3]).unwrap();
        let sizes: Vec<u32> = levels.iter().map(|t| t.size).collect();
        assert_eq!(sizes, [8, 16, 32]);
        assert!(levels.iter().all(|t| t.image.width() == t.size));
    }

    #[test]
    fn test_render_levels_missing_file() {
        assert!(render_levels(Path::new("/nonexistent/cover.png"), &[1.0], 16, [0, 0, 0]).is_err());
    }
}
