//! Mock status API for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::status_api::{CatalogJob, ProductJob, StatusApi, StatusApiError};

/// A recorded listing call for test assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordedStatusCall {
    ListCatalogJobs,
    ListProductJobs,
}

/// Mock implementation of the StatusApi trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable catalog and product listings
/// - Track calls for assertions
/// - Simulate failures
#[derive(Debug)]
pub struct MockStatusApi {
    catalog_jobs: Arc<RwLock<Vec<CatalogJob>>>,
    product_jobs: Arc<RwLock<Vec<ProductJob>>>,
    calls: Arc<RwLock<Vec<RecordedStatusCall>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<StatusApiError>>>,
}

impl Default for MockStatusApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStatusApi {
    pub fn new() -> Self {
        Self {
            catalog_jobs: Arc::new(RwLock::new(Vec::new())),
            product_jobs: Arc::new(RwLock::new(Vec::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Replace the `/input` listing.
    pub async fn set_catalog_jobs(&self, jobs: Vec<CatalogJob>) {
        *self.catalog_jobs.write().await = jobs;
    }

    /// Replace the `/product` listing.
    pub async fn set_product_jobs(&self, jobs: Vec<ProductJob>) {
        *self.product_jobs.write().await = jobs;
    }

    pub async fn recorded_calls(&self) -> Vec<RecordedStatusCall> {
        self.calls.read().await.clone()
    }

    pub async fn catalog_list_count(&self) -> usize {
        self.count(RecordedStatusCall::ListCatalogJobs).await
    }

    pub async fn product_list_count(&self) -> usize {
        self.count(RecordedStatusCall::ListProductJobs).await
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: StatusApiError) {
        *self.next_error.write().await = Some(error);
    }

    async fn take_error(&self) -> Option<StatusApiError> {
        self.next_error.write().await.take()
    }

    async fn count(&self, kind: RecordedStatusCall) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|call| **call == kind)
            .count()
    }
}

#[async_trait]
impl StatusApi for MockStatusApi {
    async fn list_catalog_jobs(&self) -> Result<Vec<CatalogJob>, StatusApiError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.calls
            .write()
            .await
            .push(RecordedStatusCall::ListCatalogJobs);
        Ok(self.catalog_jobs.read().await.clone())
    }

    async fn list_product_jobs(&self) -> Result<Vec<ProductJob>, StatusApiError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.calls
            .write()
            .await
            .push(RecordedStatusCall::ListProductJobs);
        Ok(self.product_jobs.read().await.clone())
    }
}
