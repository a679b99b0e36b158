//! Status API integration.
//!
//! The pipeline under test reports job progress through two read-only
//! collections: `GET /input` for catalog jobs and `GET /product` for product
//! jobs. Neither supports pagination or filtering, so callers always receive
//! the full listing and pick the job they track.

mod client;
mod types;

pub use client::HttpStatusClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when reading job status.
#[derive(Debug, Error)]
pub enum StatusApiError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API answered with anything other than 200.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Read access to the job status collections.
#[async_trait]
pub trait StatusApi: Send + Sync {
    /// List every catalog job (`GET /input`).
    async fn list_catalog_jobs(&self) -> Result<Vec<CatalogJob>, StatusApiError>;

    /// List every product job (`GET /product`).
    async fn list_product_jobs(&self) -> Result<Vec<ProductJob>, StatusApiError>;
}
