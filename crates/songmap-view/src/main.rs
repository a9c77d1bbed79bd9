//! songmap-view: interactive map of song clusters

mod app;
mod message;

use std::cell::RefCell;
use std::path::PathBuf;

use clap::Parser;
use iced::{window, Size, Task};

use app::SongmapApp;
use message::Message;
use songmap_core::config::open_workspace;

const WINDOW_TITLE: &str = "Song Cluster Visualization";

#[derive(Parser)]
#[command(name = "songmap-view", about = "Browse the song cluster map")]
struct Args {
    /// Workspace directory (default: ~/Music/songmap)
    #[arg(long)]
    workspace: Option<PathBuf>,

    /// Config file (default: <workspace>/songmap.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cluster table to show instead of the configured one
    #[arg(long)]
    table: Option<PathBuf>,
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let (workspace, config) = open_workspace(args.workspace, args.config);
    let mut paths = config.paths.resolve(&workspace);
    if let Some(table) = args.table {
        paths.clusters_file = table;
    }
    log::info!("songmap-view starting, table {:?}", paths.clusters_file);

    // The boot closure is Fn, so hand its inputs over exactly once
    let boot_inputs = RefCell::new(Some((paths, config)));

    iced::application(
        move || match boot_inputs.borrow_mut().take() {
            Some((paths, config)) => (SongmapApp::new(&paths, config), Task::none()),
            None => (SongmapApp::default(), Task::none()),
        },
        update,
        view,
    )
    .subscription(subscription)
    .theme(theme)
    .title(WINDOW_TITLE)
    .window(window::Settings {
        size: Size::new(600.0, 600.0),
        maximized: true,
        ..window::Settings::default()
    })
    .run()
}

fn update(app: &mut SongmapApp, message: Message) -> Task<Message> {
    app.update(message)
}

fn view(app: &SongmapApp) -> iced::Element<'_, Message> {
    app.view()
}

fn subscription(app: &SongmapApp) -> iced::Subscription<Message> {
    app.subscription()
}

fn theme(_app: &SongmapApp) -> iced::Theme {
    iced::Theme::Light
}
