//! songmap scrape - downloads audio and cover art for a tracklist
//!
//! A single headless Chrome session walks the song and cover sites for each
//! track; the files themselves are fetched directly over HTTP.

pub mod batch;
pub mod browser;
mod error;
pub mod http;
pub mod sites;

pub use batch::{run_batch, ScrapeDirs, ScrapeMode, ScrapeSummary};
pub use browser::{Scraper, TrackDownloader};
pub use error::{Result, ScrapeError};
pub use http::fetch_to_file;
