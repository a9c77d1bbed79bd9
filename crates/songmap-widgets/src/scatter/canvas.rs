//! Canvas program for the cluster scatter plot
//!
//! The canvas owns no view state. Pan and zoom are published through the
//! `on_pan` / `on_zoom` callbacks and come back in the next `ScatterPlot`.

use iced::alignment::{Horizontal, Vertical};
use iced::widget::canvas::{self, Event, Frame, Geometry, LineDash, Path, Program, Stroke, Text};
use iced::{mouse, Point, Rectangle, Size, Theme};

use songmap_core::config::ViewConfig;
use songmap_core::ClusterRow;

use super::filter::ClusterFilter;
use super::hit::{hit_test, PlottedPoint};
use super::transform::{PlotTransform, Viewport};
use crate::theme::{ClusterPalette, BACKGROUND, DOT_OUTLINE, GRID_COLOR, TOOLTIP_BACKGROUND, TOOLTIP_TEXT};
use crate::thumbnails::ThumbnailCache;

/// Half-length of the centre crosshair arms
const CROSSHAIR_ARM: f32 = 10.0;
const GRID_DASH: [f32; 2] = [2.0, 4.0];
const DOT_OUTLINE_WIDTH: f32 = 2.0;

const TOOLTIP_OFFSET_X: f32 = 15.0;
const TOOLTIP_OFFSET_Y: f32 = 10.0;
const TOOLTIP_TEXT_SIZE: f32 = 13.0;
const TOOLTIP_PADDING: f32 = 4.0;
/// Rough glyph advance relative to text size, for sizing the tooltip box
const GLYPH_WIDTH_RATIO: f32 = 0.6;

/// Layout constants taken from the view config
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotStyle {
    pub margin: f32,
    pub grid_spacing: f32,
    pub hover_radius: f32,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self::from(&ViewConfig::default())
    }
}

impl From<&ViewConfig> for PlotStyle {
    fn from(config: &ViewConfig) -> Self {
        Self {
            margin: config.margin,
            grid_spacing: config.grid_spacing,
            hover_radius: config.hover_radius,
        }
    }
}

/// Everything the plot needs to draw one frame
#[derive(Clone, Copy)]
pub struct ScatterPlot<'a> {
    pub rows: &'a [ClusterRow],
    pub thumbnails: &'a ThumbnailCache,
    pub palette: &'a ClusterPalette,
    pub viewport: Viewport,
    pub filter: ClusterFilter,
    /// Points stay hidden until thumbnails have finished loading
    pub show_points: bool,
    pub style: PlotStyle,
}

impl<'a> ScatterPlot<'a> {
    pub fn transform(&self, size: Size) -> PlotTransform {
        PlotTransform::new(size, self.rows, &self.viewport, self.style.margin)
    }
}

/// Rows that pass the filter, in table order, with their screen positions
pub fn plotted_points(plot: &ScatterPlot<'_>, transform: &PlotTransform) -> Vec<PlottedPoint> {
    if !plot.show_points {
        return Vec::new();
    }
    plot.rows
        .iter()
        .enumerate()
        .filter(|(_, row)| plot.filter.accepts(row.cluster))
        .map(|(index, row)| PlottedPoint {
            row: index,
            position: transform.to_screen(row.x, row.y),
        })
        .collect()
}

/// Fallback dot radius when a cover has no thumbnail
pub fn dot_radius(zoom: f32) -> f32 {
    (4.0 * zoom).floor().max(2.0)
}

/// Scroll direction of a wheel event, `None` for a purely horizontal scroll
fn scroll_up(delta: &mouse::ScrollDelta) -> Option<bool> {
    let y = match delta {
        mouse::ScrollDelta::Lines { y, .. } | mouse::ScrollDelta::Pixels { y, .. } => *y,
    };
    (y != 0.0).then_some(y > 0.0)
}

/// Canvas state for drag panning
#[derive(Debug, Clone, Copy, Default)]
pub struct ScatterInteraction {
    /// Last cursor position while the left button is held
    pub drag_anchor: Option<Point>,
}

/// Canvas program for the scatter plot
pub struct ScatterCanvas<'a, Message, P, Z>
where
    P: Fn(f32, f32) -> Message,
    Z: Fn(bool) -> Message,
{
    pub plot: ScatterPlot<'a>,
    pub on_pan: P,
    pub on_zoom: Z,
}

impl<'a, Message, P, Z> Program<Message> for ScatterCanvas<'a, Message, P, Z>
where
    Message: Clone,
    P: Fn(f32, f32) -> Message,
    Z: Fn(bool) -> Message,
{
    type State = ScatterInteraction;

    fn update(
        &self,
        interaction: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        match event {
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                // Anchor in window coordinates so a drag can leave the canvas
                if cursor.is_over(bounds) {
                    interaction.drag_anchor = cursor.position();
                    return Some(canvas::Action::capture());
                }
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                interaction.drag_anchor = None;
            }
            Event::Mouse(mouse::Event::CursorMoved { position }) => {
                if let Some(anchor) = interaction.drag_anchor {
                    interaction.drag_anchor = Some(*position);
                    let (dx, dy) = (position.x - anchor.x, position.y - anchor.y);
                    return Some(canvas::Action::publish((self.on_pan)(dx, dy)));
                }
                if cursor.is_over(bounds) {
                    return Some(canvas::Action::request_redraw());
                }
            }
            Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                if cursor.is_over(bounds) {
                    if let Some(up) = scroll_up(delta) {
                        return Some(canvas::Action::publish((self.on_zoom)(up)).and_capture());
                    }
                }
            }
            _ => {}
        }

        None
    }

    fn mouse_interaction(
        &self,
        interaction: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if interaction.drag_anchor.is_some() {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }

    fn draw(
        &self,
        _interaction: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let plot = &self.plot;

        frame.fill_rectangle(Point::ORIGIN, bounds.size(), BACKGROUND);
        draw_grid(&mut frame, bounds.size(), plot.style.grid_spacing);

        let transform = plot.transform(bounds.size());
        draw_crosshair(&mut frame, transform.center());

        let points = plotted_points(plot, &transform);
        let zoom = plot.viewport.zoom;

        for point in &points {
            let row = &plot.rows[point.row];
            match plot.thumbnails.best_for(&row.cover, zoom) {
                Some(level) => {
                    let size = level.size as f32;
                    let top_left = Point::new(point.position.x - size / 2.0, point.position.y - size / 2.0);
                    frame.draw_image(
                        Rectangle::new(top_left, Size::new(size, size)),
                        canvas::Image::new(level.handle.clone()),
                    );
                }
                None => {
                    let dot = Path::circle(point.position, dot_radius(zoom));
                    frame.fill(&dot, plot.palette.color(row.cluster));
                    frame.stroke(
                        &dot,
                        Stroke::default()
                            .with_color(DOT_OUTLINE)
                            .with_width(DOT_OUTLINE_WIDTH),
                    );
                }
            }
        }

        if let Some(position) = cursor.position_in(bounds) {
            if let Some(hit) = hit_test(&points, position, plot.style.hover_radius) {
                draw_tooltip(&mut frame, position, &plot.rows[hit.row].title);
            }
        }

        vec![frame.into_geometry()]
    }
}

/// Dashed lines every `spacing` px starting at the canvas origin
fn draw_grid(frame: &mut Frame, size: Size, spacing: f32) {
    if spacing <= 0.0 {
        return;
    }
    let stroke = Stroke {
        line_dash: LineDash {
            segments: &GRID_DASH,
            offset: 0,
        },
        ..Stroke::default().with_color(GRID_COLOR).with_width(1.0)
    };

    let mut x = 0.0;
    while x < size.width {
        frame.stroke(&Path::line(Point::new(x, 0.0), Point::new(x, size.height)), stroke);
        x += spacing;
    }
    let mut y = 0.0;
    while y < size.height {
        frame.stroke(&Path::line(Point::new(0.0, y), Point::new(size.width, y)), stroke);
        y += spacing;
    }
}

fn draw_crosshair(frame: &mut Frame, center: Point) {
    let stroke = Stroke::default().with_color(GRID_COLOR).with_width(1.0);
    frame.stroke(
        &Path::line(
            Point::new(center.x - CROSSHAIR_ARM, center.y),
            Point::new(center.x + CROSSHAIR_ARM, center.y),
        ),
        stroke,
    );
    frame.stroke(
        &Path::line(
            Point::new(center.x, center.y - CROSSHAIR_ARM),
            Point::new(center.x, center.y + CROSSHAIR_ARM),
        ),
        stroke,
    );
}

fn draw_tooltip(frame: &mut Frame, cursor: Point, title: &str) {
    let origin = Point::new(cursor.x + TOOLTIP_OFFSET_X, cursor.y + TOOLTIP_OFFSET_Y);
    let width = title.chars().count() as f32 * TOOLTIP_TEXT_SIZE * GLYPH_WIDTH_RATIO + 2.0 * TOOLTIP_PADDING;
    let height = TOOLTIP_TEXT_SIZE + 2.0 * TOOLTIP_PADDING;

    frame.fill_rectangle(origin, Size::new(width, height), TOOLTIP_BACKGROUND);
    frame.fill_text(Text {
        content: title.to_string(),
        position: Point::new(origin.x + TOOLTIP_PADDING, origin.y + height / 2.0),
        size: TOOLTIP_TEXT_SIZE.into(),
        color: TOOLTIP_TEXT,
        align_x: Horizontal::Left.into(),
        align_y: Vertical::Center.into(),
        ..Text::default()
    });
}
