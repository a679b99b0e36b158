//! Mock asset downloader for testing.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::assets::{asset_file_name, AssetDownloader, AssetError, DownloadedAsset};

/// Mock implementation of the AssetDownloader trait.
///
/// Writes the URL itself as the file body, so every asset gets distinct
/// content without any network access.
#[derive(Debug)]
pub struct MockAssetDownloader {
    downloaded: Arc<RwLock<Vec<String>>>,
    /// Report success without writing the file.
    skip_write: Arc<RwLock<bool>>,
    /// If set, the next download will fail with this error.
    next_error: Arc<RwLock<Option<AssetError>>>,
}

impl Default for MockAssetDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAssetDownloader {
    pub fn new() -> Self {
        Self {
            downloaded: Arc::new(RwLock::new(Vec::new())),
            skip_write: Arc::new(RwLock::new(false)),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// URLs downloaded so far, in call order.
    pub async fn downloaded_urls(&self) -> Vec<String> {
        self.downloaded.read().await.clone()
    }

    pub async fn set_skip_write(&self, skip: bool) {
        *self.skip_write.write().await = skip;
    }

    /// Configure the next download to fail with the given error.
    pub async fn set_next_error(&self, error: AssetError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl AssetDownloader for MockAssetDownloader {
    async fn download(&self, url: &str, directory: &Path) -> Result<DownloadedAsset, AssetError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let path = directory.join(asset_file_name(url)?);
        let body = url.as_bytes();

        if !*self.skip_write.read().await {
            tokio::fs::create_dir_all(directory).await.map_err(|e| {
                AssetError::DirectoryCreationFailed {
                    path: directory.to_path_buf(),
                    source: e,
                }
            })?;
            tokio::fs::write(&path, body)
                .await
                .map_err(|e| AssetError::WriteFailed {
                    path: path.clone(),
                    source: e,
                })?;
        }

        self.downloaded.write().await.push(url.to_string());

        Ok(DownloadedAsset {
            url: url.to_string(),
            path,
            bytes: body.len() as u64,
            sha256: format!("{:x}", Sha256::digest(body)),
        })
    }
}
