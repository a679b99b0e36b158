//! Types for status API responses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status reported for catalog and product jobs.
///
/// Unknown wire values are kept in [`JobStatus::Unrecognized`] so that a
/// listing with one odd job still parses; the setup state machine rejects
/// them when it reaches that job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Ingesting,
    Failed,
    Complete,
    Unrecognized(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ingesting => "ingesting",
            Self::Failed => "failed",
            Self::Complete => "complete",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "ingesting" => Self::Ingesting,
            "failed" => Self::Failed,
            "complete" => Self::Complete,
            _ => Self::Unrecognized(raw),
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Unrecognized(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An upstream catalog ingestion job (`GET /input`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogJob {
    /// Catalog job ID.
    pub id: u64,
    /// Current status.
    pub status: JobStatus,
    /// Output asset URLs, present once the job produced something.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<Vec<String>>,
}

/// A downstream product job (`GET /product`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductJob {
    /// Product job ID.
    pub id: u64,
    /// Catalog-derived input ID, see [`derive_product_input_id`](crate::derive_product_input_id).
    pub input_id: u64,
    /// Current status.
    pub status: JobStatus,
    /// Output asset URLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<Vec<String>>,
}

/// Common view over both job kinds, used by verification and downloads.
pub trait TrackedJob {
    fn job_id(&self) -> u64;
    fn status(&self) -> &JobStatus;
    fn assets(&self) -> Option<&[String]>;
}

impl TrackedJob for CatalogJob {
    fn job_id(&self) -> u64 {
        self.id
    }

    fn status(&self) -> &JobStatus {
        &self.status
    }

    fn assets(&self) -> Option<&[String]> {
        self.assets.as_deref()
    }
}

impl TrackedJob for ProductJob {
    fn job_id(&self) -> u64 {
        self.id
    }

    fn status(&self) -> &JobStatus {
        &self.status
    }

    fn assets(&self) -> Option<&[String]> {
        self.assets.as_deref()
    }
}
