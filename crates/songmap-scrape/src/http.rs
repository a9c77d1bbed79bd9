//! Direct file downloads

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, ScrapeError};

/// Download `url` to `target` with the given request headers
///
/// The body streams into `<target>.part`, renamed into place only after a
/// 200 response has been fully written. Returns the byte count.
pub fn fetch_to_file(url: &str, headers: &[(&str, &str)], target: &Path) -> Result<u64> {
    let request = headers
        .iter()
        .fold(ureq::get(url), |req, (name, value)| req.set(name, value));

    let response = match request.call() {
        Ok(response) => response,
        Err(ureq::Error::Status(status, _)) => {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status,
            })
        }
        Err(e) => {
            return Err(ScrapeError::Http {
                url: url.to_string(),
                message: e.to_string(),
            })
        }
    };

    if response.status() != 200 {
        return Err(ScrapeError::HttpStatus {
            url: url.to_string(),
            status: response.status(),
        });
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    let part = part_path(target);
    let written = write_body(response.into_reader(), &part).map_err(|e| {
        fs::remove_file(&part).ok();
        ScrapeError::Write {
            path: target.to_path_buf(),
            source: e,
        }
    })?;

    fs::rename(&part, target).map_err(|e| ScrapeError::Write {
        path: target.to_path_buf(),
        source: e,
    })?;

    log::info!("fetch_to_file: {} bytes -> {:?}", written, target);
    Ok(written)
}

fn write_body(mut reader: impl io::Read, part: &Path) -> io::Result<u64> {
    let mut file = fs::File::create(part)?;
    let written = io::copy(&mut reader, &mut file)?;
    file.flush()?;
    Ok(written)
}

fn part_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    target.with_file_name(name)
}
