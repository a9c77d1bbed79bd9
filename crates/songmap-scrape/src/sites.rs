//! Page structure of the download sites
//!
//! Selectors break when the sites change their markup; keep them here.

/// Song site: track URL input
pub const SONG_URL_INPUT: &str = "#url";
/// Song site: submit button for the track URL
pub const SONG_SUBMIT: &str = "#send";
/// Song site: the "download" form button on the result page
pub const SONG_DOWNLOAD_BUTTON: &str =
    "#download-section > div > div > div > div.mb-3.grid-container > div:nth-child(3) > form > div > button";
/// Song site: the tokenised direct link that appears after the form posts
pub const SONG_DIRECT_LINK: &str = "a[href*='rapid.spotidown.app/?token=']";

/// Cover site: track URL input (submitted with Enter)
pub const COVER_URL_INPUT: &str = "#linkInput";
/// Cover site: the resolved cover image
pub const COVER_IMAGE: &str = "#image";

/// Headers for the direct song download; the file host checks the referer
pub fn song_download_headers<'a>(user_agent: &'a str, song_site: &'a str) -> Vec<(&'static str, &'a str)> {
    vec![("User-Agent", user_agent), ("Referer", song_site)]
}

pub fn cover_download_headers(user_agent: &str) -> Vec<(&'static str, &str)> {
    vec![("User-Agent", user_agent)]
}
