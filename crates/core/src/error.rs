//! Crate-level error type.
//!
//! Every failure terminates the current invocation; recovery happens on the
//! next scheduled run. [`ProbeError::kind`] groups the variants into the
//! categories callers report on.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::assets::AssetError;
use crate::object_store::ObjectStoreError;
use crate::status_api::StatusApiError;
use crate::tracking::JobStage;

/// Broad category of a [`ProbeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Store, status API, download or local I/O failure.
    Transport,
    /// Expected marker or job is absent.
    NotFound,
    /// Data does not fit the job lifecycle (unknown status, bad marker).
    State,
    /// Upstream job reported `failed`.
    JobFailed,
    /// A scenario expectation did not hold.
    Assertion,
    /// A polling budget ran out.
    Timeout,
}

/// Errors surfaced by setup and scenario invocations.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Object store error: {0}")]
    ObjectStore(#[from] ObjectStoreError),

    #[error("Status API error: {0}")]
    StatusApi(#[from] StatusApiError),

    #[error("Asset download error: {0}")]
    Asset(#[from] AssetError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No marker for today; setup has not run.
    #[error("No test data marker {key} in bucket {bucket}; setup has not run today")]
    MarkerNotFound { bucket: String, key: String },

    /// Marker content is not a valid `TestData` record.
    #[error("Test data marker {key} is invalid: {message}")]
    InvalidMarker { key: String, message: String },

    /// Status API returned no catalog jobs to track.
    #[error("Status API returned no catalog jobs to track")]
    NoCatalogJobs,

    #[error("Catalog job {id} from test data does not exist")]
    CatalogJobNotFound { id: u64 },

    #[error("Product job for input {input_id} does not exist")]
    ProductJobNotFound { input_id: u64 },

    #[error("Catalog job {id} failed")]
    CatalogJobFailed { id: u64 },

    #[error("Product job {id} (input {input_id}) failed")]
    ProductJobFailed { id: u64, input_id: u64 },

    #[error("Unrecognized {stage} job status '{status}' for job {id}")]
    UnrecognizedStatus {
        stage: JobStage,
        id: u64,
        status: String,
    },

    /// Catalog id cannot be turned into a product input id.
    #[error("Catalog job id {0} has no product input id representation")]
    InvalidJobId(u64),

    #[error("Assertion failed: {0}")]
    Assertion(String),

    #[error("Downloaded asset missing on disk: {0}")]
    MissingDownload(PathBuf),

    #[error("Timed out after {budget:?} waiting for a complete {stage} job")]
    Timeout { stage: JobStage, budget: Duration },
}

impl ProbeError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ObjectStore(_) | Self::StatusApi(_) | Self::Asset(_) | Self::Io(_) => {
                ErrorKind::Transport
            }
            Self::MarkerNotFound { .. }
            | Self::NoCatalogJobs
            | Self::CatalogJobNotFound { .. }
            | Self::ProductJobNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidMarker { .. } | Self::UnrecognizedStatus { .. } | Self::InvalidJobId(_) => {
                ErrorKind::State
            }
            Self::CatalogJobFailed { .. } | Self::ProductJobFailed { .. } => ErrorKind::JobFailed,
            Self::Assertion(_) | Self::MissingDownload(_) => ErrorKind::Assertion,
            Self::Timeout { .. } => ErrorKind::Timeout,
        }
    }
}
