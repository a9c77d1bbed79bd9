//! Track identity and on-disk naming
//!
//! Every step finds a track's files by the same stem, `"{name} by {artist}"`,
//! so songs, covers, embeddings and table rows line up without an index.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Length of a Spotify base62 track id
const TRACK_ID_LEN: usize = 22;

const TRACK_URL_PREFIX: &str = "https://open.spotify.com/track/";

/// One entry of the tracklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRef {
    pub name: String,
    pub artist: String,
    /// Track id, `spotify:track:` URI or open.spotify.com URL
    pub uri: String,
}

impl TrackRef {
    pub fn new(name: impl Into<String>, artist: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
            uri: uri.into(),
        }
    }

    /// `"{name} by {artist}"`, safe to use as a file name
    pub fn file_stem(&self) -> String {
        format!("{} by {}", self.name.trim(), self.artist.trim())
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c => c,
            })
            .collect()
    }

    pub fn song_file_name(&self) -> String {
        format!("{}.wav", self.file_stem())
    }

    pub fn cover_file_name(&self) -> String {
        format!("{}.png", self.file_stem())
    }

    /// Canonical track URL, or `None` if `uri` isn't a recognisable track
    pub fn url(&self) -> Option<String> {
        parse_track_id(&self.uri).map(track_url)
    }
}

/// Extract the base62 track id from an id, URI or share URL
pub fn parse_track_id(input: &str) -> Option<&str> {
    let input = input.trim();

    let candidate = if let Some(rest) = input.strip_prefix("spotify:track:") {
        rest
    } else if let Some(rest) = input
        .strip_prefix("https://open.spotify.com/")
        .or_else(|| input.strip_prefix("http://open.spotify.com/"))
    {
        // Localised share links carry an `intl-xx/` segment
        let rest = match rest.split_once('/') {
            Some((first, tail)) if first.starts_with("intl-") => tail,
            _ => rest,
        };
        let rest = rest.strip_prefix("track/")?;
        rest.split(['?', '#', '/']).next().unwrap_or_default()
    } else {
        input
    };

    is_track_id(candidate).then_some(candidate)
}

fn is_track_id(s: &str) -> bool {
    s.len() == TRACK_ID_LEN && s.chars().all(|c| c.is_ascii_alphanumeric())
}

pub fn track_url(id: &str) -> String {
    format!("{}{}", TRACK_URL_PREFIX, id)
}

/// Load a YAML list of `{ name, artist, uri }` entries
pub fn load_tracklist(path: &Path) -> Result<Vec<TrackRef>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tracklist: {:?}", path))?;
    let tracks: Vec<TrackRef> = serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse tracklist: {:?}", path))?;
    log::info!("load_tracklist: {} tracks from {:?}", tracks.len(), path);
    Ok(tracks)
}
