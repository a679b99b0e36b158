//! Scenario runner implementation.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::assets::{asset_file_name, AssetDownloader};
use crate::config::{Config, PollConfig};
use crate::error::ProbeError;
use crate::marker::{MarkerKey, MarkerStore};
use crate::object_store::{upload_file, ObjectStore};
use crate::status_api::{CatalogJob, ProductJob, StatusApi, StatusApiError, TrackedJob};
use crate::tracking::{derive_product_input_id, find_catalog_job, find_product_job, JobStage};

use super::poll::poll_until;
use super::types::{ScenarioReport, StageReport};

/// Asserts on the tracked job pair and downloads its assets.
pub struct ScenarioRunner {
    store: Arc<dyn ObjectStore>,
    status_api: Arc<dyn StatusApi>,
    downloader: Arc<dyn AssetDownloader>,
    markers: MarkerStore,
    bucket: String,
    seed_file: PathBuf,
    artifacts_root: PathBuf,
    poll: PollConfig,
}

impl ScenarioRunner {
    pub fn new(
        config: &Config,
        store: Arc<dyn ObjectStore>,
        status_api: Arc<dyn StatusApi>,
        downloader: Arc<dyn AssetDownloader>,
    ) -> Self {
        let markers = MarkerStore::new(
            Arc::clone(&store),
            config.storage.test_data_bucket_name.clone(),
        );

        Self {
            store,
            status_api,
            downloader,
            markers,
            bucket: config.storage.bucket_name.clone(),
            seed_file: config.setup.seed_file.clone(),
            artifacts_root: config.artifacts.root.clone(),
            poll: config.poll.clone(),
        }
    }

    /// Check today's tracked jobs.
    pub async fn run(&self) -> Result<ScenarioReport, ProbeError> {
        self.run_at(Utc::now()).await
    }

    /// Check the jobs tracked by the marker for `now`'s date. Artifact
    /// directories are stamped with `now`.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<ScenarioReport, ProbeError> {
        let key = MarkerKey::for_instant(now);
        let marker = self.markers.require(&key).await?;
        info!("Scenario for marker {}: catalog job {}", key, marker.id);

        let catalog = find_catalog_job(self.status_api.list_catalog_jobs().await?, marker.id)?;
        let product = find_product_job(self.status_api.list_product_jobs().await?, marker.id)?;

        self.verify_at(&catalog, &product, now).await
    }

    /// Upload a fresh seed, wait for a complete catalog job and its product
    /// job, then check them.
    pub async fn watch(&self) -> Result<ScenarioReport, ProbeError> {
        let started = Utc::now();
        upload_file(
            self.store.as_ref(),
            &self.bucket,
            &self.seed_file,
            started.timestamp_millis(),
        )
        .await?;

        let api = self.status_api.as_ref();

        info!(
            "Waiting up to {:?} for a complete catalog job",
            self.poll.budget()
        );
        let catalog = poll_until(JobStage::Catalog, &self.poll, move || async move {
            let jobs = api.list_catalog_jobs().await?;
            Ok::<_, StatusApiError>(jobs.into_iter().find(|job| job.status.is_complete()))
        })
        .await?;

        let input_id = derive_product_input_id(catalog.id)?;
        info!(
            "Catalog job {} complete, waiting for product job with input {}",
            catalog.id, input_id
        );
        let product = poll_until(JobStage::Product, &self.poll, move || async move {
            let jobs = api.list_product_jobs().await?;
            Ok::<_, StatusApiError>(jobs
                .into_iter()
                .find(|job| job.status.is_complete() && job.input_id == input_id))
        })
        .await?;

        self.verify_at(&catalog, &product, Utc::now()).await
    }

    /// Assert both jobs are complete with assets, then download every asset
    /// and check it landed on disk.
    pub async fn verify_at(
        &self,
        catalog: &CatalogJob,
        product: &ProductJob,
        now: DateTime<Utc>,
    ) -> Result<ScenarioReport, ProbeError> {
        let catalog_assets = assert_ready(JobStage::Catalog, catalog)?;
        let product_assets = assert_ready(JobStage::Product, product)?;
        assert_distinct_files(JobStage::Catalog, catalog_assets)?;
        assert_distinct_files(JobStage::Product, product_assets)?;

        let run_millis = now.timestamp_millis();
        let catalog = self
            .download_stage(JobStage::Catalog, catalog.id, catalog_assets, run_millis)
            .await?;
        let product = self
            .download_stage(JobStage::Product, product.id, product_assets, run_millis)
            .await?;

        let report = ScenarioReport { catalog, product };
        info!(
            "Scenario passed: {} assets, {} bytes",
            report.total_assets(),
            report.total_bytes()
        );
        Ok(report)
    }

    async fn download_stage(
        &self,
        stage: JobStage,
        job_id: u64,
        urls: &[String],
        run_millis: i64,
    ) -> Result<StageReport, ProbeError> {
        let directory = self
            .artifacts_root
            .join(format!("{}-{}", run_millis, stage));

        let mut assets = Vec::with_capacity(urls.len());
        for url in urls {
            let asset = self.downloader.download(url, &directory).await?;
            if !tokio::fs::try_exists(&asset.path).await? {
                return Err(ProbeError::MissingDownload(asset.path));
            }
            assets.push(asset);
        }

        info!(
            "Downloaded {} {} assets to {:?}",
            assets.len(),
            stage,
            directory
        );

        Ok(StageReport {
            stage,
            job_id,
            directory,
            assets,
        })
    }
}

/// A job is ready when it is complete and lists at least one asset.
fn assert_ready(stage: JobStage, job: &impl TrackedJob) -> Result<&[String], ProbeError> {
    if !job.status().is_complete() {
        return Err(ProbeError::Assertion(format!(
            "{} job {} is {}, expected complete",
            stage,
            job.job_id(),
            job.status()
        )));
    }

    match job.assets() {
        Some(assets) if !assets.is_empty() => Ok(assets),
        _ => Err(ProbeError::Assertion(format!(
            "{} job {} has no assets",
            stage,
            job.job_id()
        ))),
    }
}

/// Every asset of a stage must land in its own file.
fn assert_distinct_files(stage: JobStage, urls: &[String]) -> Result<(), ProbeError> {
    let mut seen: HashMap<String, &str> = HashMap::with_capacity(urls.len());
    for url in urls {
        let file_name = asset_file_name(url)?;
        if let Some(previous) = seen.insert(file_name.clone(), url) {
            return Err(ProbeError::Assertion(format!(
                "{} assets {} and {} both resolve to file {}",
                stage, previous, url, file_name
            )));
        }
    }
    Ok(())
}
