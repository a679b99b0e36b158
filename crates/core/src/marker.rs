//! Daily test-data marker.
//!
//! One JSON record per UTC calendar day, stored in the test-data bucket under
//! `<YYYY-MM-DD>.json`, naming the catalog job tracked for that day. A new
//! day gets a new key; old markers are left in place.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ProbeError;
use crate::object_store::{ObjectStore, UploadedFile};

/// Marker payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestData {
    /// Catalog job id tracked today.
    pub id: u64,
}

/// Object key of a day's marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerKey(String);

impl MarkerKey {
    pub fn for_date(date: NaiveDate) -> Self {
        Self(format!("{}.json", date.format("%Y-%m-%d")))
    }

    /// Key for the UTC calendar date of `now`.
    pub fn for_instant(now: DateTime<Utc>) -> Self {
        Self::for_date(now.date_naive())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarkerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reads and writes markers in the test-data bucket.
#[derive(Clone)]
pub struct MarkerStore {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl MarkerStore {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub async fn exists(&self, key: &MarkerKey) -> Result<bool, ProbeError> {
        let exists = self.store.exists(&self.bucket, key.as_str()).await?;
        debug!("Marker {} exists: {}", key, exists);
        Ok(exists)
    }

    pub async fn load(&self, key: &MarkerKey) -> Result<TestData, ProbeError> {
        let raw = self.store.get(&self.bucket, key.as_str()).await?;
        serde_json::from_str(&raw).map_err(|e| ProbeError::InvalidMarker {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// Load the marker, or fail with `MarkerNotFound` when today has none.
    pub async fn require(&self, key: &MarkerKey) -> Result<TestData, ProbeError> {
        if !self.exists(key).await? {
            return Err(ProbeError::MarkerNotFound {
                bucket: self.bucket.clone(),
                key: key.to_string(),
            });
        }
        self.load(key).await
    }

    pub async fn save(&self, key: &MarkerKey, data: TestData) -> Result<UploadedFile, ProbeError> {
        let content = serde_json::to_vec(&data).map_err(|e| ProbeError::InvalidMarker {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        let uploaded = self.store.put(&self.bucket, key.as_str(), content).await?;
        info!("Wrote marker {} tracking catalog job {}", key, data.id);
        Ok(uploaded)
    }
}
