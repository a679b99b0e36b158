//! Daily setup implementation.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::ProbeError;
use crate::marker::{MarkerKey, MarkerStore, TestData};
use crate::object_store::{upload_file, ObjectStore};
use crate::status_api::{CatalogJob, JobStatus, ProductJob, StatusApi};
use crate::tracking::{derive_product_input_id, find_catalog_job, find_product_job, JobStage};

use super::types::SetupOutcome;

/// Invoked when both tracked jobs are complete, before `run` returns.
pub type CompletionCallback = Arc<dyn Fn(&CatalogJob, &ProductJob) + Send + Sync>;

/// Drives the tracked job pair one step per invocation.
pub struct DailySetup {
    store: Arc<dyn ObjectStore>,
    status_api: Arc<dyn StatusApi>,
    markers: MarkerStore,
    bucket: String,
    seed_file: PathBuf,
    on_complete: Option<CompletionCallback>,
}

impl DailySetup {
    pub fn new(
        config: &Config,
        store: Arc<dyn ObjectStore>,
        status_api: Arc<dyn StatusApi>,
    ) -> Self {
        let markers = MarkerStore::new(
            Arc::clone(&store),
            config.storage.test_data_bucket_name.clone(),
        );

        Self {
            store,
            status_api,
            markers,
            bucket: config.storage.bucket_name.clone(),
            seed_file: config.setup.seed_file.clone(),
            on_complete: None,
        }
    }

    /// Register a hook fired when both jobs are complete.
    pub fn with_on_complete(mut self, callback: CompletionCallback) -> Self {
        self.on_complete = Some(callback);
        self
    }

    /// Run one invocation for the current UTC day.
    pub async fn run(&self) -> Result<SetupOutcome, ProbeError> {
        self.run_at(Utc::now()).await
    }

    /// Run one invocation as if it were `now`.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<SetupOutcome, ProbeError> {
        let key = MarkerKey::for_instant(now);
        info!("Running daily setup for marker {}", key);

        if !self.markers.exists(&key).await? {
            return self.trigger(&key, now).await;
        }

        let marker = self.markers.load(&key).await?;
        info!("Marker {} tracks catalog job {}", key, marker.id);

        self.advance(marker).await
    }

    /// No marker yet: upload the seed and start tracking the first listed job.
    async fn trigger(
        &self,
        key: &MarkerKey,
        now: DateTime<Utc>,
    ) -> Result<SetupOutcome, ProbeError> {
        info!("No marker for today, uploading seed {:?}", self.seed_file);

        let seed = upload_file(
            self.store.as_ref(),
            &self.bucket,
            &self.seed_file,
            now.timestamp_millis(),
        )
        .await?;

        let jobs = self.status_api.list_catalog_jobs().await?;
        if jobs.len() > 1 {
            warn!(
                "Status API listed {} catalog jobs, tracking the first one",
                jobs.len()
            );
        }

        let job = jobs.into_iter().next().ok_or(ProbeError::NoCatalogJobs)?;

        self.markers.save(key, TestData { id: job.id }).await?;

        info!("Triggered: tracking catalog job {}", job.id);
        Ok(SetupOutcome::Triggered {
            catalog_job_id: job.id,
            seed,
        })
    }

    /// Marker present: check the catalog job, then its product job.
    async fn advance(&self, marker: TestData) -> Result<SetupOutcome, ProbeError> {
        let catalog = find_catalog_job(self.status_api.list_catalog_jobs().await?, marker.id)?;

        match &catalog.status {
            JobStatus::Complete => {}
            JobStatus::Ingesting => {
                info!("Catalog job {} still ingesting", catalog.id);
                return Ok(SetupOutcome::CatalogIngesting {
                    catalog_job_id: catalog.id,
                });
            }
            JobStatus::Failed => return Err(ProbeError::CatalogJobFailed { id: catalog.id }),
            JobStatus::Unrecognized(raw) => {
                return Err(ProbeError::UnrecognizedStatus {
                    stage: JobStage::Catalog,
                    id: catalog.id,
                    status: raw.clone(),
                })
            }
        }

        info!(
            "Catalog job {} complete, checking product job {}",
            catalog.id,
            derive_product_input_id(catalog.id)?
        );

        let product = find_product_job(self.status_api.list_product_jobs().await?, marker.id)?;

        match &product.status {
            JobStatus::Complete => {}
            JobStatus::Ingesting => {
                info!("Product job {} still ingesting", product.id);
                return Ok(SetupOutcome::ProductIngesting {
                    catalog_job_id: catalog.id,
                    product_job_id: product.id,
                });
            }
            JobStatus::Failed => {
                return Err(ProbeError::ProductJobFailed {
                    id: product.id,
                    input_id: product.input_id,
                })
            }
            JobStatus::Unrecognized(raw) => {
                return Err(ProbeError::UnrecognizedStatus {
                    stage: JobStage::Product,
                    id: product.id,
                    status: raw.clone(),
                })
            }
        }

        info!(
            "Catalog job {} and product job {} complete",
            catalog.id, product.id
        );

        if let Some(callback) = &self.on_complete {
            callback(&catalog, &product);
        }

        Ok(SetupOutcome::Done { catalog, product })
    }
}
