//! Resolving the tracked catalog job and its product job from a listing.

use std::fmt;

use serde::Serialize;

use crate::error::ProbeError;
use crate::status_api::{CatalogJob, ProductJob};

/// Which half of the pipeline a job belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobStage {
    Catalog,
    Product,
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog => f.write_str("Catalog"),
            Self::Product => f.write_str("Product"),
        }
    }
}

/// Product jobs reference their catalog job as the digit `5` prepended to
/// the catalog id (`42` -> `542`).
pub fn derive_product_input_id(catalog_id: u64) -> Result<u64, ProbeError> {
    format!("5{}", catalog_id)
        .parse()
        .map_err(|_| ProbeError::InvalidJobId(catalog_id))
}

/// Find the catalog job with `id`.
pub fn find_catalog_job(jobs: Vec<CatalogJob>, id: u64) -> Result<CatalogJob, ProbeError> {
    jobs.into_iter()
        .find(|job| job.id == id)
        .ok_or(ProbeError::CatalogJobNotFound { id })
}

/// Find the product job belonging to catalog job `catalog_id`.
pub fn find_product_job(
    jobs: Vec<ProductJob>,
    catalog_id: u64,
) -> Result<ProductJob, ProbeError> {
    let input_id = derive_product_input_id(catalog_id)?;
    jobs.into_iter()
        .find(|job| job.input_id == input_id)
        .ok_or(ProbeError::ProductJobNotFound { input_id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::fixtures;

    #[test]
    fn test_derive_product_input_id() {
        assert_eq!(derive_product_input_id(0).unwrap(), 50);
        assert_eq!(derive_product_input_id(7).unwrap(), 57);
        assert_eq!(derive_product_input_id(42).unwrap(), 542);
        assert_eq!(derive_product_input_id(123).unwrap(), 5123);
    }

    #[test]
    fn test_derive_matches_string_prefix_for_range() {
        for n in (0..100_000u64).step_by(997) {
            let expected: u64 = format!("5{}", n).parse().unwrap();
            assert_eq!(derive_product_input_id(n).unwrap(), expected);
        }
    }

    #[test]
    fn test_derive_overflow_is_rejected() {
        let err = derive_product_input_id(u64::MAX).unwrap_err();
        assert!(matches!(err, ProbeError::InvalidJobId(id) if id == u64::MAX));
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[test]
    fn test_find_catalog_job() {
        let jobs = vec![
            fixtures::ingesting_catalog_job(1),
            fixtures::complete_catalog_job(2, 1),
        ];
        let job = find_catalog_job(jobs, 2).unwrap();
        assert_eq!(job.id, 2);
    }

    #[test]
    fn test_find_catalog_job_missing() {
        let result = find_catalog_job(vec![fixtures::ingesting_catalog_job(1)], 9);
        assert!(matches!(result, Err(ProbeError::CatalogJobNotFound { id: 9 })));
    }

    #[test]
    fn test_find_product_job_uses_derived_id() {
        let jobs = vec![
            fixtures::complete_product_job(100, 42, 1),
            fixtures::complete_product_job(101, 542, 1),
        ];
        let job = find_product_job(jobs, 42).unwrap();
        assert_eq!(job.id, 101);
    }

    #[test]
    fn test_find_product_job_missing_is_not_found() {
        let result = find_product_job(vec![fixtures::complete_product_job(100, 43, 1)], 42);
        let err = result.unwrap_err();
        assert!(matches!(err, ProbeError::ProductJobNotFound { input_id: 542 }));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
