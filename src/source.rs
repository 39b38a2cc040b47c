//! Source dataset providers for the compiler
//!
//! The original generators grew three near-duplicate build drivers; here a
//! single compiler is fed through one trait with two providers: a local
//! file (with stdin and transparent gzip support) and a remote fetch of the
//! upstream dataset with mirror fallback.

use crate::error::{IpRegionError, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Upstream dataset location plus a CDN mirror, tried in order
pub const DEFAULT_SOURCE_URLS: &[&str] = &[
    "https://raw.githubusercontent.com/lionsoul2014/ip2region/master/data/ipv4_source.txt",
    "https://cdn.jsdelivr.net/gh/lionsoul2014/ip2region@master/data/ipv4_source.txt",
];

/// Something that can produce the raw source dataset text
pub trait SourceProvider {
    /// Fetch the complete dataset. Failure here is fatal to the compile
    /// run; the compiler never emits partial artifacts.
    fn fetch(&self) -> Result<String>;

    /// Human-readable origin for diagnostics
    fn describe(&self) -> String;
}

/// Local file provider. Path `-` reads stdin; a `.gz` extension is
/// decompressed transparently.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a provider for `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SourceProvider for FileSource {
    fn fetch(&self) -> Result<String> {
        let mut text = String::new();
        if self.path.to_str() == Some("-") {
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| IpRegionError::Io(format!("read stdin: {}", e)))?;
            return Ok(text);
        }

        let file = File::open(&self.path)
            .map_err(|e| IpRegionError::Io(format!("open {}: {}", self.path.display(), e)))?;

        let is_gzip = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("gz"))
            .unwrap_or(false);

        if is_gzip {
            GzDecoder::new(file)
                .read_to_string(&mut text)
                .map_err(|e| IpRegionError::Io(format!("gunzip {}: {}", self.path.display(), e)))?;
        } else {
            let mut file = file;
            file.read_to_string(&mut text)
                .map_err(|e| IpRegionError::Io(format!("read {}: {}", self.path.display(), e)))?;
        }
        Ok(text)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Remote provider: tries each URL in order, first success wins
pub struct RemoteSource {
    urls: Vec<String>,
}

impl RemoteSource {
    /// Provider over the default upstream URL and its mirror
    pub fn new() -> Self {
        Self {
            urls: DEFAULT_SOURCE_URLS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Provider over an explicit URL list
    pub fn with_urls(urls: Vec<String>) -> Self {
        Self { urls }
    }
}

impl Default for RemoteSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceProvider for RemoteSource {
    fn fetch(&self) -> Result<String> {
        let mut last_err = IpRegionError::Fetch("no source URLs configured".to_string());
        for url in &self.urls {
            match ureq::get(url.as_str()).call() {
                Ok(mut response) => {
                    return response
                        .body_mut()
                        .read_to_string()
                        .map_err(|e| IpRegionError::Fetch(format!("{}: {}", url, e)));
                }
                Err(e) => {
                    last_err = IpRegionError::Fetch(format!("{}: {}", url, e));
                }
            }
        }
        Err(last_err)
    }

    fn describe(&self) -> String {
        self.urls.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_file_source_plain() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("src.txt");
        std::fs::write(&path, "1.0.0.0|1.0.0.255|CN|0|0|isp\n").unwrap();
        let text = FileSource::new(&path).fetch().unwrap();
        assert!(text.starts_with("1.0.0.0|"));
    }

    #[test]
    fn test_file_source_gzip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("src.txt.gz");
        let file = std::fs::File::create(&path).unwrap();
        let mut enc = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        enc.write_all(b"1.0.0.0|1.0.0.255|CN|0|0|isp\n").unwrap();
        enc.finish().unwrap();

        let text = FileSource::new(&path).fetch().unwrap();
        assert!(text.starts_with("1.0.0.0|"));
    }

    #[test]
    fn test_file_source_missing_is_error() {
        let err = FileSource::new("/nonexistent/source.txt").fetch().unwrap_err();
        assert!(matches!(err, IpRegionError::Io(_)));
    }

    #[test]
    fn test_remote_source_all_urls_failing_is_fatal() {
        // Invalid URLs fail fast in the client; exercises the
        // fallback-then-fail path without touching the network
        let src = RemoteSource::with_urls(vec![
            "not a url".to_string(),
            "also not a url".to_string(),
        ]);
        let err = src.fetch().unwrap_err();
        assert!(matches!(err, IpRegionError::Fetch(_)));
    }

    #[test]
    fn test_remote_source_empty_url_list_is_fatal() {
        let err = RemoteSource::with_urls(Vec::new()).fetch().unwrap_err();
        assert!(matches!(err, IpRegionError::Fetch(_)));
    }
}
