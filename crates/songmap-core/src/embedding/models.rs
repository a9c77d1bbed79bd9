//! Embedding model download and caching
//!
//! The ONNX model is fetched from Essentia's model hub on first use and kept
//! in the model cache (`~/.cache/songmap/models` unless configured).

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::error::{EmbedError, Result};

/// Discogs-EffNet, dynamic batch size variant
pub const EFFNET_FILENAME: &str = "discogs-effnet-bsdynamic-1.onnx";
pub const EFFNET_URL: &str =
    "https://essentia.upf.edu/models/feature-extractors/discogs-effnet/discogs-effnet-bsdynamic-1.onnx";

/// Locates the embedding model, downloading it when missing
pub struct ModelManager {
    cache_dir: PathBuf,
    url: String,
}

impl ModelManager {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            url: EFFNET_URL.to_string(),
        }
    }

    /// Use a different download location (mirrors, tests)
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn model_path(&self) -> PathBuf {
        self.cache_dir.join(EFFNET_FILENAME)
    }

    pub fn is_available(&self) -> bool {
        self.model_path().exists()
    }

    /// Model path, downloading first if necessary
    pub fn ensure_model(&self) -> Result<PathBuf> {
        let model_path = self.model_path();

        if model_path.exists() {
            log::info!("ensure_model: Found {:?}", model_path);
            return Ok(model_path);
        }

        log::info!("ensure_model: Downloading {} to {:?}", self.url, model_path);
        self.download(&model_path)?;
        Ok(model_path)
    }

    fn download(&self, target: &Path) -> Result<()> {
        fs::create_dir_all(&self.cache_dir)?;

        let temp_path = target.with_extension("tmp");
        let downloaded = match self.stream_to(&temp_path) {
            Ok(n) => n,
            Err(e) => {
                fs::remove_file(&temp_path).ok();
                return Err(e);
            }
        };

        fs::rename(&temp_path, target)?;
        log::info!("ensure_model: Downloaded {:?} ({} bytes)", target, downloaded);
        Ok(())
    }

    /// Write the response body to `temp_path`, checking it against `Content-Length`
    fn stream_to(&self, temp_path: &Path) -> Result<u64> {
        let response = ureq::get(&self.url)
            .call()
            .map_err(|e| EmbedError::ModelDownloadFailed(format!("{}: {}", self.url, e)))?;

        let content_length: Option<u64> = response
            .header("Content-Length")
            .and_then(|s| s.parse().ok());

        let mut file = fs::File::create(temp_path)?;
        let mut reader = response.into_reader();
        let mut buffer = [0u8; 8192];
        let mut downloaded: u64 = 0;

        loop {
            let n = reader
                .read(&mut buffer)
                .map_err(|e| EmbedError::ModelDownloadFailed(format!("Read error: {}", e)))?;
            if n == 0 {
                break;
            }
            file.write_all(&buffer[..n])?;
            downloaded += n as u64;
        }
        file.flush()?;

        match content_length {
            Some(expected) if downloaded != expected => Err(EmbedError::ModelDownloadFailed(format!(
                "Download incomplete: expected {} bytes, got {}",
                expected, downloaded
            ))),
            _ => Ok(downloaded),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;
    use std::thread;

    /// Answer one request with `body`, announcing `content_length` bytes
    fn serve_once(content_length: usize, body: &'static [u8]) -> (String, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/{}", listener.local_addr().unwrap(), EFFNET_FILENAME);
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line.trim().is_empty() {
                    break;
                }
            }
            write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                content_length
            )
            .unwrap();
            stream.write_all(body).unwrap();
        });
        (url, handle)
    }

    #[test]
    fn test_model_path() {
        let mgr = ModelManager::new("/tmp/songmap-models".into());
        assert_eq!(
            mgr.model_path(),
            PathBuf::from("/tmp/songmap-models/discogs-effnet-bsdynamic-1.onnx")
        );
    }

    #[test]
    fn test_ensure_existing_model_skips_download() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(EFFNET_FILENAME), b"onnx").unwrap();

        // An unroutable URL proves no request is made
        let mgr = ModelManager::new(dir.path().to_path_buf()).with_url("http://127.0.0.1:9/none");
        assert!(mgr.is_available());
        assert_eq!(mgr.ensure_model().unwrap(), dir.path().join(EFFNET_FILENAME));
    }

    #[test]
    fn test_failed_download_leaves_no_model() {
        let dir = tempfile::tempdir().unwrap();
        let mgr = ModelManager::new(dir.path().to_path_buf()).with_url("http://127.0.0.1:9/none");

        let err = mgr.ensure_model().unwrap_err();
        assert!(matches!(err, EmbedError::ModelDownloadFailed(_)));
        assert!(!mgr.is_available());
    }

    #[test]
    fn test_download_writes_model() {
        let dir = tempfile::tempdir().unwrap();
        let (url, server) = serve_once(4, b"onnx");
        let mgr = ModelManager::new(dir.path().to_path_buf()).with_url(url);

        let path = mgr.ensure_model().unwrap();
        server.join().unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"onnx");
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_truncated_download_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (url, server) = serve_once(1024, b"partial");
        let mgr = ModelManager::new(dir.path().to_path_buf()).with_url(url);

        let err = mgr.ensure_model().unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, EmbedError::ModelDownloadFailed(_)));
        assert!(!mgr.is_available());
        assert!(!mgr.model_path().with_extension("tmp").exists());
    }
}
