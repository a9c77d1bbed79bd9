//! Viewer state and iced update/view

use std::path::Path;
use std::time::Duration;

use iced::alignment::{Horizontal, Vertical};
use iced::widget::{column, container, radio, stack, text};
use iced::{Color, Element, Length, Subscription, Task};

use songmap_core::config::{ResolvedPaths, SongmapConfig, ViewConfig};
use songmap_core::{ClusterRow, ClusterTable};
use songmap_widgets::{
    mpsc_subscription, progress_percent, scatter_plot, ClusterFilter, ClusterPalette, PlotStyle,
    ScatterPlot, ThumbnailCache, ThumbnailEvent, ThumbnailLoader, Viewport,
};

use crate::message::Message;

const PANEL_PADDING: f32 = 10.0;
const STATUS_TEXT_SIZE: f32 = 14.0;

#[derive(Default)]
pub struct SongmapApp {
    rows: Vec<ClusterRow>,
    thumbnails: ThumbnailCache,
    palette: ClusterPalette,
    view_config: ViewConfig,
    viewport: Viewport,
    filter: ClusterFilter,
    show_points: bool,
    /// Bottom status line; `None` once hidden
    status: Option<String>,
    loader: Option<ThumbnailLoader>,
}

impl SongmapApp {
    pub fn new(paths: &ResolvedPaths, config: SongmapConfig) -> Self {
        let view_config = config.view;
        let palette = ClusterPalette::from_labels(&view_config.clusters);
        let mut app = Self {
            palette,
            viewport: Viewport::new(view_config.initial_zoom),
            view_config,
            ..Self::default()
        };

        match ClusterTable::load(&paths.clusters_file) {
            Ok(table) => {
                log::info!("SongmapApp::new: {} rows from {:?}", table.len(), paths.clusters_file);
                app.rows = table.rows;
                app.start_loader(&paths.covers_dir);
            }
            Err(e) => {
                log::error!("SongmapApp::new: {}", e);
                app.status = Some(format!("Failed to load cluster table: {}", e));
            }
        }
        app
    }

    fn start_loader(&mut self, covers_dir: &Path) {
        match ThumbnailLoader::spawn(&self.rows, covers_dir, &self.view_config, &self.palette) {
            Ok(loader) => {
                self.loader = Some(loader);
                self.status = Some(loading_status(0, self.rows.len()));
            }
            Err(e) => {
                // Without thumbnails the plot still works with dots
                log::error!("SongmapApp: Could not start thumbnail loader: {}", e);
                self.show_points = true;
                self.status = Some(format!("Thumbnails unavailable: {}", e));
            }
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Thumbnail(event) => return self.handle_thumbnail(event),
            Message::Pan(dx, dy) => self.viewport.pan(dx, dy),
            Message::Zoom(scroll_up) => self.viewport.zoom_by(scroll_up),
            Message::SelectFilter(filter) => self.filter = filter,
            Message::HideStatus => self.status = None,
        }
        Task::none()
    }

    fn handle_thumbnail(&mut self, event: ThumbnailEvent) -> Task<Message> {
        match event {
            ThumbnailEvent::Loaded { cover, thumbnails, loaded, total } => {
                if let Some(thumbnails) = thumbnails {
                    self.thumbnails.insert(cover, thumbnails);
                }
                self.status = Some(loading_status(loaded, total));
                Task::none()
            }
            ThumbnailEvent::Finished { total, failed } => {
                log::info!("SongmapApp: Thumbnails ready ({} covers, {} failed)", total, failed);
                self.loader = None;
                self.show_points = true;
                self.status = Some("Ready".to_string());

                let linger = Duration::from_millis(self.view_config.status_linger_ms);
                Task::perform(tokio::time::sleep(linger), |_| Message::HideStatus)
            }
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        match &self.loader {
            Some(loader) => mpsc_subscription(loader.receiver()).map(Message::Thumbnail),
            None => Subscription::none(),
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let plot = scatter_plot(
            ScatterPlot {
                rows: &self.rows,
                thumbnails: &self.thumbnails,
                palette: &self.palette,
                viewport: self.viewport,
                filter: self.filter,
                show_points: self.show_points,
                style: PlotStyle::from(&self.view_config),
            },
            Message::Pan,
            Message::Zoom,
        );

        let panel = container(self.view_filter_panel())
            .width(Length::Fill)
            .align_x(Horizontal::Right)
            .padding(PANEL_PADDING);

        let mut layers = stack![plot, panel];
        if let Some(status) = &self.status {
            layers = layers.push(
                container(text(status.as_str()).size(STATUS_TEXT_SIZE).color(Color::BLACK))
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .align_y(Vertical::Bottom)
                    .padding(PANEL_PADDING),
            );
        }
        layers.into()
    }

    /// "All" plus one radio per configured cluster
    fn view_filter_panel(&self) -> Element<'_, Message> {
        let selected = Some(self.filter);
        let mut options = column![radio("All", ClusterFilter::All, selected, Message::SelectFilter)].spacing(6);
        for entry in self.palette.entries() {
            options = options.push(radio(
                entry.name.as_str(),
                ClusterFilter::Only(entry.id),
                selected,
                Message::SelectFilter,
            ));
        }

        container(options)
            .padding(PANEL_PADDING)
            .style(|_theme| container::Style {
                background: Some(Color::WHITE.into()),
                ..Default::default()
            })
            .into()
    }
}

fn loading_status(loaded: usize, total: usize) -> String {
    format!("Loading images... {}%", progress_percent(loaded, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with_rows(n: usize) -> SongmapApp {
        let rows = (0..n)
            .map(|i| ClusterRow {
                cover: format!("{}.png", i),
                x: i as f64,
                y: 0.0,
                cluster: (i % 2) as i32,
                title: format!("Song {}", i),
            })
            .collect::<Vec<_>>();
        let view_config = ViewConfig::default();
        SongmapApp {
            rows,
            palette: ClusterPalette::from_labels(&view_config.clusters),
            viewport: Viewport::new(view_config.initial_zoom),
            status: Some(loading_status(0, n)),
            view_config,
            ..SongmapApp::default()
        }
    }

    #[test]
    fn test_loading_status_text() {
        assert_eq!(loading_status(0, 4), "Loading images... 0%");
        assert_eq!(loading_status(1, 3), "Loading images... 33%");
        assert_eq!(loading_status(0, 0), "Loading images... 100%");
    }

    #[tokio::test]
    async fn test_progress_then_ready() {
        let mut app = app_with_rows(4);
        let _ = app.update(Message::Thumbnail(ThumbnailEvent::Loaded {
            cover: "0.png".into(),
            thumbnails: None,
            loaded: 2,
            total: 4,
        }));
        assert_eq!(app.status.as_deref(), Some("Loading images... 50%"));
        assert!(!app.show_points);
        assert!(app.thumbnails.is_empty());

        let _ = app.update(Message::Thumbnail(ThumbnailEvent::Finished { total: 4, failed: 1 }));
        assert_eq!(app.status.as_deref(), Some("Ready"));
        assert!(app.show_points);

        let _ = app.update(Message::HideStatus);
        assert!(app.status.is_none());
    }

    #[test]
    fn test_pan_zoom_and_filter() {
        let mut app = app_with_rows(2);
        let _ = app.update(Message::Pan(10.0, -4.0));
        let _ = app.update(Message::Pan(1.0, 1.0));
        assert_eq!(app.viewport.offset, iced::Vector::new(11.0, -3.0));

        let _ = app.update(Message::Zoom(true));
        assert!((app.viewport.zoom - 0.66).abs() < 1e-5);

        let _ = app.update(Message::SelectFilter(ClusterFilter::Only(1)));
        assert_eq!(app.filter, ClusterFilter::Only(1));
    }

    #[test]
    fn test_missing_table_shows_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = SongmapConfig::default().paths.resolve(dir.path());

        let app = SongmapApp::new(&paths, SongmapConfig::default());
        assert!(app.rows.is_empty());
        assert!(app.loader.is_none());
        assert!(app.status.as_deref().unwrap().starts_with("Failed to load cluster table"));
    }

    #[test]
    fn test_loads_table_and_starts_loader() {
        let dir = tempfile::tempdir().unwrap();
        let paths = SongmapConfig::default().paths.resolve(dir.path());
        ClusterTable {
            rows: vec![ClusterRow::for_audio("Song by Band.wav", 0.5, -0.5, 2)],
        }
        .save(&paths.clusters_file)
        .unwrap();

        let app = SongmapApp::new(&paths, SongmapConfig::default());
        assert_eq!(app.rows.len(), 1);
        assert!(app.loader.is_some());
        assert_eq!(app.viewport.zoom, 0.6);
        assert_eq!(app.status.as_deref(), Some("Loading images... 0%"));
    }
}
