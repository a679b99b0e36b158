pub mod assets;
pub mod config;
pub mod error;
pub mod marker;
pub mod object_store;
pub mod scenario;
pub mod setup;
pub mod status_api;
pub mod testing;
pub mod tracking;

pub use assets::{AssetDownloader, AssetError, DownloadedAsset, HttpAssetDownloader};
pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use error::{ErrorKind, ProbeError};
pub use marker::{MarkerKey, MarkerStore, TestData};
pub use object_store::{ObjectStore, ObjectStoreError, S3ObjectStore, UploadedFile};
pub use scenario::{ScenarioReport, ScenarioRunner, StageReport};
pub use setup::{CompletionCallback, DailySetup, SetupOutcome};
pub use status_api::{
    CatalogJob, HttpStatusClient, JobStatus, ProductJob, StatusApi, StatusApiError,
};
pub use tracking::{derive_product_input_id, JobStage};
