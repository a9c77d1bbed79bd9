//! songmap-scrape: download songs and covers for a tracklist

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use songmap_core::config::open_workspace;
use songmap_core::track::{load_tracklist, TrackRef};
use songmap_scrape::{run_batch, ScrapeDirs, ScrapeMode, Scraper};

#[derive(Parser)]
#[command(name = "songmap-scrape", about = "Download audio and cover art for tracks")]
struct Args {
    /// Workspace directory (default: ~/Music/songmap)
    #[arg(long)]
    workspace: Option<PathBuf>,

    /// Config file (default: <workspace>/songmap.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// YAML list of { name, artist, uri } (default: configured tracklist)
    #[arg(long, conflicts_with = "uri")]
    tracklist: Option<PathBuf>,

    /// Single track id or URL
    #[arg(long, requires_all = ["name", "artist"])]
    uri: Option<String>,

    /// Track name for --uri
    #[arg(long, requires = "uri")]
    name: Option<String>,

    /// Artist for --uri
    #[arg(long, requires = "uri")]
    artist: Option<String>,

    /// Only download audio
    #[arg(long, conflicts_with = "covers_only")]
    songs_only: bool,

    /// Only download cover art
    #[arg(long)]
    covers_only: bool,

    /// Re-download files that already exist
    #[arg(long)]
    force: bool,

    /// Show the browser window
    #[arg(long)]
    show_browser: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let (workspace, mut config) = open_workspace(args.workspace, args.config);
    let paths = config.paths.resolve(&workspace);
    if args.show_browser {
        config.scrape.headless = false;
    }

    let tracks = match (args.uri, args.name, args.artist) {
        (Some(uri), Some(name), Some(artist)) => vec![TrackRef::new(name, artist, uri)],
        _ => {
            let tracklist = args.tracklist.unwrap_or(paths.tracklist_file.clone());
            load_tracklist(&tracklist)?
        }
    };
    if tracks.is_empty() {
        bail!("No tracks to download");
    }

    let mode = if args.songs_only {
        ScrapeMode::SongsOnly
    } else if args.covers_only {
        ScrapeMode::CoversOnly
    } else {
        ScrapeMode::Both
    };

    let dirs = ScrapeDirs {
        songs_dir: paths.songs_dir,
        covers_dir: paths.covers_dir,
    };

    let scraper = Scraper::launch(&config.scrape).context("Is Chrome or Chromium installed?")?;
    let skip_existing = config.scrape.skip_existing && !args.force;
    let summary = run_batch(&scraper, &tracks, &dirs, mode, skip_existing)?;

    println!(
        "Downloaded {} songs and {} covers ({} skipped, {} failed)",
        summary.songs_downloaded, summary.covers_downloaded, summary.skipped, summary.failed
    );
    for (stem, error) in &summary.failures {
        println!("  {}: {}", stem, error);
    }
    Ok(())
}
