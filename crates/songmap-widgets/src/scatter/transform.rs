//! Data-space to screen-space mapping for the scatter plot

use iced::{Point, Size, Vector};
use songmap_core::ClusterRow;

/// Zoom step per wheel notch
const ZOOM_IN_FACTOR: f32 = 1.1;
const ZOOM_OUT_FACTOR: f32 = 0.9;

/// Share of the usable area the data extent fills at zoom 1.0
const FILL_RATIO: f32 = 0.8;

/// User-controlled view state: zoom factor and pan offset in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f32,
    pub offset: Vector,
}

impl Viewport {
    pub fn new(zoom: f32) -> Self {
        Self {
            zoom,
            offset: Vector::new(0.0, 0.0),
        }
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.offset = self.offset + Vector::new(dx, dy);
    }

    /// One wheel notch: scroll up zooms in, scroll down zooms out
    pub fn zoom_by(&mut self, scroll_up: bool) {
        self.zoom *= if scroll_up { ZOOM_IN_FACTOR } else { ZOOM_OUT_FACTOR };
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Screen mapping for one frame
///
/// The data extent is taken symmetrically around the origin so that
/// `(0, 0)` always lands on the plot centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotTransform {
    center: Point,
    scale: f32,
}

impl PlotTransform {
    pub fn new(size: Size, rows: &[ClusterRow], viewport: &Viewport, margin: f32) -> Self {
        let center = Point::new(
            (size.width / 2.0).floor() + viewport.offset.x,
            (size.height / 2.0).floor() + viewport.offset.y,
        );

        let extent_x = symmetric_extent(rows.iter().map(|r| r.x));
        let extent_y = symmetric_extent(rows.iter().map(|r| r.y));
        let scale_x = axis_scale(size.width, margin, extent_x);
        let scale_y = axis_scale(size.height, margin, extent_y);

        Self {
            center,
            scale: scale_x.min(scale_y) * FILL_RATIO * viewport.zoom,
        }
    }

    /// Map a data point to canvas coordinates (y grows upward in data space)
    pub fn to_screen(&self, x: f64, y: f64) -> Point {
        Point::new(
            self.center.x + x as f32 * self.scale,
            self.center.y - y as f32 * self.scale,
        )
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn center(&self) -> Point {
        self.center
    }
}

/// `max(|min|, |max|)` over the values, 0 when empty
fn symmetric_extent(values: impl Iterator<Item = f64>) -> f32 {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min > max {
        return 0.0;
    }
    min.abs().max(max.abs()) as f32
}

fn axis_scale(length: f32, margin: f32, extent: f32) -> f32 {
    if extent == 0.0 {
        1.0
    } else {
        (length - 2.0 * margin) / extent.max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(x: f64, y: f64) -> ClusterRow {
        ClusterRow {
            cover: String::new(),
            x,
            y,
            cluster: 0,
            title: String::new(),
        }
    }

    #[test]
    fn test_viewport_zoom_steps() {
        let mut viewport = Viewport::new(1.0);
        viewport.zoom_by(true);
        assert!((viewport.zoom - 1.1).abs() < 1e-6);
        viewport.zoom_by(false);
        assert!((viewport.zoom - 0.99).abs() < 1e-6);
    }

    #[test]
    fn test_viewport_pan_accumulates() {
        let mut viewport = Viewport::default();
        viewport.pan(10.0, -5.0);
        viewport.pan(2.5, 1.0);
        assert_eq!(viewport.offset, Vector::new(12.5, -4.0));
    }

    #[test]
    fn test_transform_scale_and_center() {
        // x extent 2, y extent 4: scale_x = 500/2, scale_y = 300/4
        let rows = [row(-2.0, 1.0), row(1.0, -4.0)];
        let transform = PlotTransform::new(Size::new(600.0, 400.0), &rows, &Viewport::new(1.0), 50.0);

        assert_eq!(transform.center(), Point::new(300.0, 200.0));
        assert!((transform.scale() - 75.0 * 0.8).abs() < 1e-4);

        let p = transform.to_screen(1.0, 1.0);
        assert!((p.x - 360.0).abs() < 1e-3);
        assert!((p.y - 140.0).abs() < 1e-3);
    }

    #[test]
    fn test_transform_small_extent_is_not_magnified() {
        // Extents below 1 divide by 1
        let rows = [row(0.25, 0.5)];
        let transform = PlotTransform::new(Size::new(300.0, 300.0), &rows, &Viewport::new(1.0), 50.0);
        assert!((transform.scale() - 200.0 * 0.8).abs() < 1e-4);
    }

    #[test]
    fn test_transform_empty_and_zero_extent() {
        let viewport = Viewport::new(0.5);
        let empty = PlotTransform::new(Size::new(100.0, 100.0), &[], &viewport, 10.0);
        assert!((empty.scale() - 0.4).abs() < 1e-6);

        let origin = PlotTransform::new(Size::new(100.0, 100.0), &[row(0.0, 0.0)], &viewport, 10.0);
        assert_eq!(origin.to_screen(0.0, 0.0), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_transform_center_floors_and_offsets() {
        let mut viewport = Viewport::new(1.0);
        viewport.pan(5.0, -3.0);
        let transform = PlotTransform::new(Size::new(301.0, 99.0), &[], &viewport, 0.0);
        assert_eq!(transform.center(), Point::new(155.0, 46.0));
    }
}
