//! Scenario report types.

use std::path::PathBuf;

use serde::Serialize;

use crate::assets::DownloadedAsset;
use crate::tracking::JobStage;

/// Downloads made for one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: JobStage,
    pub job_id: u64,
    /// Per-run directory the assets were written to.
    pub directory: PathBuf,
    /// One entry per asset URL, in listing order.
    pub assets: Vec<DownloadedAsset>,
}

/// Result of a passing scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    pub catalog: StageReport,
    pub product: StageReport,
}

impl ScenarioReport {
    pub fn total_assets(&self) -> usize {
        self.catalog.assets.len() + self.product.assets.len()
    }

    pub fn total_bytes(&self) -> u64 {
        self.catalog
            .assets
            .iter()
            .chain(self.product.assets.iter())
            .map(|asset| asset.bytes)
            .sum()
    }
}
