//! Testing utilities and mock implementations.
//!
//! This module provides in-memory implementations of the object store,
//! status API and asset downloader traits, so setup and scenario runs can be
//! exercised without AWS or network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use probe_core::testing::{fixtures, MockObjectStore, MockStatusApi};
//!
//! let store = MockObjectStore::new();
//! let api = MockStatusApi::new();
//!
//! api.set_catalog_jobs(vec![fixtures::ingesting_catalog_job(42)]).await;
//!
//! let setup = DailySetup::new(&fixtures::config(), Arc::new(store), Arc::new(api));
//! ```

mod mock_asset_downloader;
mod mock_object_store;
mod mock_status_api;

pub use mock_asset_downloader::MockAssetDownloader;
pub use mock_object_store::{MockObjectStore, RecordedStoreCall};
pub use mock_status_api::{MockStatusApi, RecordedStatusCall};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::config::{
        ArtifactsConfig, AwsConfig, Config, PollConfig, SetupConfig, StatusApiConfig,
        StorageConfig,
    };
    use crate::status_api::{CatalogJob, JobStatus, ProductJob};

    /// Configuration pointing at the `pipeline-input` and
    /// `pipeline-test-data` buckets.
    pub fn config() -> Config {
        Config {
            aws: AwsConfig {
                region: "eu-west-2".to_string(),
                endpoint_url: None,
                force_path_style: false,
            },
            storage: StorageConfig {
                bucket_name: "pipeline-input".to_string(),
                test_data_bucket_name: "pipeline-test-data".to_string(),
            },
            status_api: StatusApiConfig {
                base_url: "https://status.example.com".to_string(),
                timeout_secs: 30,
            },
            artifacts: ArtifactsConfig::default(),
            setup: SetupConfig::default(),
            poll: PollConfig::default(),
        }
    }

    /// Asset URLs for a job, e.g. `https://cdn.example.com/catalog/42/asset-1.jpg`.
    pub fn asset_urls(kind: &str, id: u64, count: usize) -> Vec<String> {
        (1..=count)
            .map(|i| format!("https://cdn.example.com/{}/{}/asset-{}.jpg", kind, id, i))
            .collect()
    }

    pub fn ingesting_catalog_job(id: u64) -> CatalogJob {
        CatalogJob {
            id,
            status: JobStatus::Ingesting,
            assets: None,
        }
    }

    pub fn complete_catalog_job(id: u64, asset_count: usize) -> CatalogJob {
        CatalogJob {
            id,
            status: JobStatus::Complete,
            assets: Some(asset_urls("catalog", id, asset_count)),
        }
    }

    pub fn failed_catalog_job(id: u64) -> CatalogJob {
        CatalogJob {
            id,
            status: JobStatus::Failed,
            assets: None,
        }
    }

    pub fn ingesting_product_job(id: u64, input_id: u64) -> ProductJob {
        ProductJob {
            id,
            input_id,
            status: JobStatus::Ingesting,
            assets: None,
        }
    }

    pub fn complete_product_job(id: u64, input_id: u64, asset_count: usize) -> ProductJob {
        ProductJob {
            id,
            input_id,
            status: JobStatus::Complete,
            assets: Some(asset_urls("product", id, asset_count)),
        }
    }

    pub fn failed_product_job(id: u64, input_id: u64) -> ProductJob {
        ProductJob {
            id,
            input_id,
            status: JobStatus::Failed,
            assets: None,
        }
    }
}
