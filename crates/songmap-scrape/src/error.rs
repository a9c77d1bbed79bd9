//! Scraper error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Browser error while {step}: {message}")]
    Browser { step: &'static str, message: String },

    #[error("Timed out waiting for {selector}: {message}")]
    ElementTimeout { selector: String, message: String },

    #[error("Element {selector} has no {attribute} attribute")]
    MissingAttribute {
        selector: String,
        attribute: &'static str,
    },

    #[error("Not a track id or URL: {0:?}")]
    InvalidTrack(String),

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("Failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
