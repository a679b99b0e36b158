//! Object storage access.
//!
//! This module provides the `ObjectStore` trait used for seed uploads and the
//! daily marker, plus an S3 implementation.
//!
//! # Example
//!
//! ```ignore
//! use probe_core::object_store::{ObjectStore, S3ObjectStore};
//!
//! let store = S3ObjectStore::from_config(&config.aws).await;
//! let uploaded = store.put("pipeline-input", "seed.jpg", bytes).await?;
//! assert!(store.exists("pipeline-input", &uploaded.file_name).await?);
//! ```

mod s3;

pub use s3::S3ObjectStore;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Errors that can occur when talking to the object store.
#[derive(Debug, Error)]
pub enum ObjectStoreError {
    /// Upload failed.
    #[error("Failed to upload s3://{bucket}/{key}: {message}")]
    Upload {
        bucket: String,
        key: String,
        message: String,
    },

    /// Existence check failed for a reason other than "not found".
    #[error("Failed to check s3://{bucket}/{key}: {message}")]
    Check {
        bucket: String,
        key: String,
        message: String,
    },

    /// Download failed or the body could not be read.
    #[error("Failed to fetch s3://{bucket}/{key}: {message}")]
    Fetch {
        bucket: String,
        key: String,
        message: String,
    },

    /// Local source file could not be read.
    #[error("Failed to read {path}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Local source path has no file name to derive a key from.
    #[error("Cannot derive an object key from {0}")]
    InvalidSource(PathBuf),
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub bucket_name: String,
    pub file_name: String,
    pub e_tag: String,
}

/// Minimal put/head/get surface over a bucketed object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `content` under `bucket/key`.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        content: Vec<u8>,
    ) -> Result<UploadedFile, ObjectStoreError>;

    /// Whether `bucket/key` exists. A "not found" answer is `Ok(false)`.
    async fn exists(&self, bucket: &str, key: &str) -> Result<bool, ObjectStoreError>;

    /// Fetch `bucket/key` as a UTF-8 string.
    async fn get(&self, bucket: &str, key: &str) -> Result<String, ObjectStoreError>;
}

/// Key for a seed upload: `<epochMillis>-<basename>`.
pub fn unique_object_key(epoch_millis: i64, source: &Path) -> Result<String, ObjectStoreError> {
    let basename = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| ObjectStoreError::InvalidSource(source.to_path_buf()))?;

    Ok(format!("{}-{}", epoch_millis, basename))
}

/// Read a local file and upload it under a uniqueness-salted key.
pub async fn upload_file(
    store: &dyn ObjectStore,
    bucket: &str,
    source: &Path,
    epoch_millis: i64,
) -> Result<UploadedFile, ObjectStoreError> {
    let key = unique_object_key(epoch_millis, source)?;

    let content = tokio::fs::read(source)
        .await
        .map_err(|e| ObjectStoreError::ReadSource {
            path: source.to_path_buf(),
            source: e,
        })?;

    let uploaded = store.put(bucket, &key, content).await?;

    info!(
        "Uploaded {:?} to s3://{}/{}",
        source, uploaded.bucket_name, uploaded.file_name
    );

    Ok(uploaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockObjectStore;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_unique_object_key() {
        let key = unique_object_key(1_700_000_000_123, Path::new("./fixtures/grumpycat.jpg"))
            .unwrap();
        assert_eq!(key, "1700000000123-grumpycat.jpg");
    }

    #[test]
    fn test_unique_object_key_without_file_name() {
        let result = unique_object_key(1, Path::new("/"));
        assert!(matches!(result, Err(ObjectStoreError::InvalidSource(_))));
    }

    #[tokio::test]
    async fn test_upload_file_stores_content_under_salted_key() {
        let mut source = NamedTempFile::new().unwrap();
        source.write_all(b"seed bytes").unwrap();

        let store = MockObjectStore::new();
        let uploaded = upload_file(&store, "pipeline-input", source.path(), 42)
            .await
            .unwrap();

        let basename = source.path().file_name().unwrap().to_string_lossy();
        assert_eq!(uploaded.bucket_name, "pipeline-input");
        assert_eq!(uploaded.file_name, format!("42-{}", basename));
        assert!(!uploaded.e_tag.is_empty());
        assert_eq!(
            store.object("pipeline-input", &uploaded.file_name).await,
            Some(b"seed bytes".to_vec())
        );
    }

    #[tokio::test]
    async fn test_upload_missing_file_fails_before_put() {
        let store = MockObjectStore::new();
        let result = upload_file(&store, "in", Path::new("/nonexistent/seed.jpg"), 1).await;

        assert!(matches!(result, Err(ObjectStoreError::ReadSource { .. })));
        assert!(store.recorded_calls().await.is_empty());
    }
}
