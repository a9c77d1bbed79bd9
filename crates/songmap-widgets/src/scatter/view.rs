//! View function for the scatter plot canvas

use iced::widget::Canvas;
use iced::{Element, Length};

use super::canvas::{ScatterCanvas, ScatterPlot};

/// Full-size scatter plot element
///
/// `on_pan` receives the drag delta in pixels, `on_zoom` receives `true`
/// for a scroll up.
///
/// ```ignore
/// let plot = scatter_plot(
///     self.plot(),
///     |dx, dy| Message::Pan(dx, dy),
///     Message::Zoom,
/// );
/// ```
pub fn scatter_plot<'a, Message>(
    plot: ScatterPlot<'a>,
    on_pan: impl Fn(f32, f32) -> Message + 'a,
    on_zoom: impl Fn(bool) -> Message + 'a,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    Canvas::new(ScatterCanvas { plot, on_pan, on_zoom })
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
