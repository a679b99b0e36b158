//! Mock object store for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::object_store::{ObjectStore, ObjectStoreError, UploadedFile};

/// A recorded store operation for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedStoreCall {
    Put { bucket: String, key: String },
    Exists { bucket: String, key: String },
    Get { bucket: String, key: String },
}

/// In-memory implementation of the ObjectStore trait.
///
/// Objects are kept per `(bucket, key)`. The returned ETag is the hex MD5
/// of the content, matching what S3 reports for single-part uploads.
///
/// # Example
///
/// ```rust,ignore
/// use probe_core::testing::MockObjectStore;
///
/// let store = MockObjectStore::new();
/// store.insert_object("test-data", "2024-05-01.json", br#"{"id":1}"#.to_vec()).await;
///
/// assert!(store.exists("test-data", "2024-05-01.json").await?);
/// ```
#[derive(Debug)]
pub struct MockObjectStore {
    objects: Arc<RwLock<HashMap<(String, String), Vec<u8>>>>,
    calls: Arc<RwLock<Vec<RecordedStoreCall>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<ObjectStoreError>>>,
}

impl Default for MockObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Seed an object without recording a call.
    pub async fn insert_object(&self, bucket: &str, key: &str, content: Vec<u8>) {
        self.objects
            .write()
            .await
            .insert((bucket.to_string(), key.to_string()), content);
    }

    /// Raw content of `bucket/key`, if stored.
    pub async fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Number of objects stored in `bucket`.
    pub async fn object_count(&self, bucket: &str) -> usize {
        self.objects
            .read()
            .await
            .keys()
            .filter(|(b, _)| b == bucket)
            .count()
    }

    /// Keys stored in `bucket`, sorted.
    pub async fn keys(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .read()
            .await
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    pub async fn recorded_calls(&self) -> Vec<RecordedStoreCall> {
        self.calls.read().await.clone()
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: ObjectStoreError) {
        *self.next_error.write().await = Some(error);
    }

    async fn take_error(&self) -> Option<ObjectStoreError> {
        self.next_error.write().await.take()
    }

    async fn record(&self, call: RecordedStoreCall) {
        self.calls.write().await.push(call);
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        content: Vec<u8>,
    ) -> Result<UploadedFile, ObjectStoreError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.record(RecordedStoreCall::Put {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
        .await;

        let e_tag = format!("{:x}", md5::compute(&content));
        self.insert_object(bucket, key, content).await;

        Ok(UploadedFile {
            bucket_name: bucket.to_string(),
            file_name: key.to_string(),
            e_tag,
        })
    }

    async fn exists(&self, bucket: &str, key: &str) -> Result<bool, ObjectStoreError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.record(RecordedStoreCall::Exists {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
        .await;

        Ok(self.object(bucket, key).await.is_some())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<String, ObjectStoreError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.record(RecordedStoreCall::Get {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
        .await;

        let content = self
            .object(bucket, key)
            .await
            .ok_or_else(|| ObjectStoreError::Fetch {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: "NoSuchKey".to_string(),
            })?;

        String::from_utf8(content).map_err(|e| ObjectStoreError::Fetch {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: e.to_string(),
        })
    }
}
