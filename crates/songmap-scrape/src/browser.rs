//! Headless Chrome session driving the download sites

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Browser, Element, LaunchOptions, Tab};

use songmap_core::config::ScrapeConfig;
use songmap_core::TrackRef;

use crate::error::{Result, ScrapeError};
use crate::http::fetch_to_file;
use crate::sites;

/// Fetches the two assets of a track
///
/// Implemented by [`Scraper`]; the batch runner only needs this much.
pub trait TrackDownloader {
    fn download_song(&self, track: &TrackRef, songs_dir: &Path) -> Result<PathBuf>;
    fn download_cover(&self, track: &TrackRef, covers_dir: &Path) -> Result<PathBuf>;
}

/// One browser with one tab, reused for every track
pub struct Scraper {
    // Dropping the browser kills the Chrome process; keep it alive with the tab
    _browser: Browser,
    tab: Arc<Tab>,
    config: ScrapeConfig,
}

impl Scraper {
    pub fn launch(config: &ScrapeConfig) -> Result<Self> {
        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .sandbox(false)
            .window_size(Some((config.window_width, config.window_height)))
            .args(vec![
                OsStr::new("--disable-gpu"),
                OsStr::new("--disable-dev-shm-usage"),
            ])
            .idle_browser_timeout(Duration::from_secs(config.wait_timeout_secs.max(30) * 4))
            .build()
            .map_err(|e| ScrapeError::Launch(e.to_string()))?;

        let browser = Browser::new(options).map_err(|e| ScrapeError::Launch(format!("{:#}", e)))?;
        let tab = browser
            .new_tab()
            .map_err(|e| ScrapeError::Launch(format!("{:#}", e)))?;

        log::info!(
            "Scraper::launch: Chrome started ({}x{}, headless={})",
            config.window_width,
            config.window_height,
            config.headless
        );

        Ok(Self {
            _browser: browser,
            tab,
            config: config.clone(),
        })
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.wait_timeout_secs)
    }

    fn open(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| ScrapeError::Browser {
                step: "opening page",
                message: format!("{} ({:#})", url, e),
            })?;
        Ok(())
    }

    fn wait_for(&self, selector: &str) -> Result<Element<'_>> {
        self.tab
            .wait_for_element_with_custom_timeout(selector, self.timeout())
            .map_err(|e| ScrapeError::ElementTimeout {
                selector: selector.to_string(),
                message: format!("{:#}", e),
            })
    }

    fn attribute(&self, element: &Element<'_>, selector: &str, attribute: &'static str) -> Result<String> {
        element
            .get_attribute_value(attribute)
            .map_err(|e| ScrapeError::Browser {
                step: "reading attribute",
                message: format!("{:#}", e),
            })?
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ScrapeError::MissingAttribute {
                selector: selector.to_string(),
                attribute,
            })
    }

    fn track_url(track: &TrackRef) -> Result<String> {
        track
            .url()
            .ok_or_else(|| ScrapeError::InvalidTrack(track.uri.clone()))
    }
}

fn browser_step(step: &'static str) -> impl FnOnce(anyhow::Error) -> ScrapeError {
    move |e| ScrapeError::Browser {
        step,
        message: format!("{:#}", e),
    }
}

impl TrackDownloader for Scraper {
    fn download_song(&self, track: &TrackRef, songs_dir: &Path) -> Result<PathBuf> {
        let track_url = Self::track_url(track)?;
        log::info!("download_song: {} ({})", track.file_stem(), track_url);

        self.open(&self.config.song_site)?;
        self.wait_for(sites::SONG_URL_INPUT)?
            .type_into(&track_url)
            .map_err(browser_step("typing track URL"))?;
        self.wait_for(sites::SONG_SUBMIT)?
            .click()
            .map_err(browser_step("submitting track URL"))?;
        self.wait_for(sites::SONG_DOWNLOAD_BUTTON)?
            .click()
            .map_err(browser_step("requesting download"))?;

        let link = self.wait_for(sites::SONG_DIRECT_LINK)?;
        let download_url = self.attribute(&link, sites::SONG_DIRECT_LINK, "href")?;

        let target = songs_dir.join(track.song_file_name());
        let headers = sites::song_download_headers(&self.config.user_agent, &self.config.song_site);
        fetch_to_file(&download_url, &headers, &target)?;
        Ok(target)
    }

    fn download_cover(&self, track: &TrackRef, covers_dir: &Path) -> Result<PathBuf> {
        let track_url = Self::track_url(track)?;
        log::info!("download_cover: {} ({})", track.file_stem(), track_url);

        self.open(&self.config.cover_site)?;
        self.wait_for(sites::COVER_URL_INPUT)?
            .type_into(&track_url)
            .map_err(browser_step("typing track URL"))?;
        self.tab
            .press_key("Enter")
            .map_err(browser_step("submitting track URL"))?;

        let image = self.wait_for(sites::COVER_IMAGE)?;
        let image_url = self.attribute(&image, sites::COVER_IMAGE, "src")?;

        let target = covers_dir.join(track.cover_file_name());
        let headers = sites::cover_download_headers(&self.config.user_agent);
        fetch_to_file(&image_url, &headers, &target)?;
        Ok(target)
    }
}

impl Drop for Scraper {
    fn drop(&mut self) {
        if let Err(e) = self.tab.close(false) {
            log::debug!("Scraper: Failed to close tab: {:#}", e);
        }
        log::info!("Scraper: Closing browser");
    }
}
