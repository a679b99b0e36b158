//! Downloading job output assets to the local filesystem.

mod downloader;

pub use downloader::HttpAssetDownloader;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while downloading an asset.
#[derive(Debug, Error)]
pub enum AssetError {
    /// URL cannot be parsed or has no file name segment.
    #[error("Invalid asset URL: {0}")]
    InvalidUrl(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("Asset {url} returned HTTP {status}")]
    BadStatus { url: String, status: u16 },

    /// Failed to create the target directory.
    #[error("Failed to create directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the downloaded file.
    #[error("Failed to write {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A file written by a downloader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadedAsset {
    /// Source URL.
    pub url: String,
    /// Local path the body was written to.
    pub path: PathBuf,
    /// Bytes written.
    pub bytes: u64,
    /// Hex SHA-256 of the body.
    pub sha256: String,
}

/// Fetches an asset URL into a local directory.
#[async_trait]
pub trait AssetDownloader: Send + Sync {
    /// Download `url` into `directory/<basename(url)>`, creating `directory`
    /// when missing. Returns once the file is fully written.
    async fn download(&self, url: &str, directory: &Path) -> Result<DownloadedAsset, AssetError>;
}

/// Percent-decoded last path segment of an asset URL.
pub fn asset_file_name(url: &str) -> Result<String, AssetError> {
    let parsed = Url::parse(url).map_err(|_| AssetError::InvalidUrl(url.to_string()))?;

    let segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| AssetError::InvalidUrl(url.to_string()))?;

    let decoded = urlencoding::decode(segment)
        .map_err(|_| AssetError::InvalidUrl(url.to_string()))?
        .into_owned();

    // A decoded separator would escape the target directory.
    if decoded.contains('/') || decoded.contains('\\') || decoded == ".." || decoded == "." {
        return Err(AssetError::InvalidUrl(url.to_string()));
    }

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_file_name() {
        assert_eq!(
            asset_file_name("https://cdn.example.com/out/42/thumb.jpg").unwrap(),
            "thumb.jpg"
        );
    }

    #[test]
    fn test_asset_file_name_ignores_query() {
        assert_eq!(
            asset_file_name("https://cdn.example.com/a/b.png?sig=abc#frag").unwrap(),
            "b.png"
        );
    }

    #[test]
    fn test_asset_file_name_decodes_percent_encoding() {
        assert_eq!(
            asset_file_name("https://cdn.example.com/grumpy%20cat.jpg").unwrap(),
            "grumpy cat.jpg"
        );
    }

    #[test]
    fn test_asset_file_name_rejects_directory_urls() {
        assert!(matches!(
            asset_file_name("https://cdn.example.com/assets/"),
            Err(AssetError::InvalidUrl(_))
        ));
        assert!(asset_file_name("https://cdn.example.com").is_err());
    }

    #[test]
    fn test_asset_file_name_rejects_encoded_separators() {
        assert!(asset_file_name("https://cdn.example.com/..%2F..%2Fetc%2Fpasswd").is_err());
    }

    #[test]
    fn test_asset_file_name_rejects_garbage() {
        assert!(asset_file_name("not a url").is_err());
    }
}
