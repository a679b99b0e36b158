//! Types for the daily setup state machine.

use serde::Serialize;

use crate::object_store::UploadedFile;
use crate::status_api::{CatalogJob, ProductJob};

/// Non-failing result of one setup invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SetupOutcome {
    /// Marker written; the seed upload kicked off today's catalog job.
    Triggered {
        catalog_job_id: u64,
        seed: UploadedFile,
    },
    /// Tracked catalog job is still ingesting.
    CatalogIngesting { catalog_job_id: u64 },
    /// Catalog job finished; its product job is still ingesting.
    ProductIngesting {
        catalog_job_id: u64,
        product_job_id: u64,
    },
    /// Both jobs are complete.
    Done {
        catalog: CatalogJob,
        product: ProductJob,
    },
}

impl SetupOutcome {
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::Triggered { .. } => "triggered",
            Self::CatalogIngesting { .. } => "catalog_ingesting",
            Self::ProductIngesting { .. } => "product_ingesting",
            Self::Done { .. } => "done",
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status_api::JobStatus;

    #[test]
    fn test_state_names() {
        let outcome = SetupOutcome::CatalogIngesting { catalog_job_id: 1 };
        assert_eq!(outcome.state_name(), "catalog_ingesting");
        assert!(!outcome.is_done());
    }

    #[test]
    fn test_serialize_tagged() {
        let outcome = SetupOutcome::Done {
            catalog: CatalogJob {
                id: 1,
                status: JobStatus::Complete,
                assets: None,
            },
            product: ProductJob {
                id: 2,
                input_id: 51,
                status: JobStatus::Complete,
                assets: None,
            },
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["state"], "done");
        assert_eq!(value["product"]["input_id"], 51);
    }
}
