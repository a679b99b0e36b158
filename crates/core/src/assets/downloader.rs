//! reqwest-backed asset downloader.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use sha2::{Digest, Sha256};
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, warn};

use super::{asset_file_name, AssetDownloader, AssetError, DownloadedAsset};

/// Downloads assets over HTTP(S), streaming the body to disk.
pub struct HttpAssetDownloader {
    client: Client,
}

impl HttpAssetDownloader {
    pub fn new(timeout: Duration) -> Result<Self, AssetError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AssetDownloader for HttpAssetDownloader {
    async fn download(&self, url: &str, directory: &Path) -> Result<DownloadedAsset, AssetError> {
        let file_name = asset_file_name(url)?;

        fs::create_dir_all(directory)
            .await
            .map_err(|e| AssetError::DirectoryCreationFailed {
                path: directory.to_path_buf(),
                source: e,
            })?;

        let path = directory.join(file_name);

        debug!("Downloading {} to {:?}", url, path);

        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssetError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let written = write_body(&mut response, &path).await;
        let (bytes, sha256) = match written {
            Ok(written) => written,
            Err(e) => {
                // Never leave a truncated asset behind.
                if let Err(remove_err) = fs::remove_file(&path).await {
                    if remove_err.kind() != std::io::ErrorKind::NotFound {
                        warn!("Failed to remove partial download {:?}: {}", path, remove_err);
                    }
                }
                return Err(e);
            }
        };

        debug!("Downloaded {} ({} bytes)", url, bytes);

        Ok(DownloadedAsset {
            url: url.to_string(),
            path,
            bytes,
            sha256,
        })
    }
}

/// Stream the response body to `path`, returning the byte count and hex
/// SHA-256. The file is synced before returning.
async fn write_body(response: &mut Response, path: &Path) -> Result<(u64, String), AssetError> {
    let write_error = |e: std::io::Error| AssetError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::create(path).await.map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    let mut hasher = Sha256::new();
    let mut bytes = 0u64;

    while let Some(chunk) = response.chunk().await? {
        hasher.update(&chunk);
        bytes += chunk.len() as u64;
        writer.write_all(&chunk).await.map_err(write_error)?;
    }

    writer.flush().await.map_err(write_error)?;
    writer.into_inner().sync_all().await.map_err(write_error)?;

    Ok((bytes, format!("{:x}", hasher.finalize())))
}
