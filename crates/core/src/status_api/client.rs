//! reqwest-backed status API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{CatalogJob, ProductJob};
use super::{StatusApi, StatusApiError};
use crate::config::StatusApiConfig;

/// Status API client.
pub struct HttpStatusClient {
    client: Client,
    base_url: String,
}

impl HttpStatusClient {
    /// Create a new status API client.
    pub fn new(config: &StatusApiConfig) -> Result<Self, StatusApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_secs)))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_collection<T: DeserializeOwned>(
        &self,
        collection: &str,
    ) -> Result<Vec<T>, StatusApiError> {
        let url = format!("{}/{}", self.base_url, collection);

        debug!("Status API request: GET {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(StatusApiError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let jobs: Vec<T> = response.json().await.map_err(|e| {
            StatusApiError::ParseError(format!("Failed to parse /{} response: {}", collection, e))
        })?;

        debug!("Status API /{} returned {} jobs", collection, jobs.len());

        Ok(jobs)
    }
}

#[async_trait]
impl StatusApi for HttpStatusClient {
    async fn list_catalog_jobs(&self) -> Result<Vec<CatalogJob>, StatusApiError> {
        self.fetch_collection("input").await
    }

    async fn list_product_jobs(&self) -> Result<Vec<ProductJob>, StatusApiError> {
        self.fetch_collection("product").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status_api::JobStatus;
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base_url: String) -> HttpStatusClient {
        HttpStatusClient::new(&StatusApiConfig {
            base_url,
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_catalog_jobs() {
        let router = Router::new().route(
            "/input",
            get(|| async {
                Json(json!([
                    {"id": 42, "status": "complete", "assets": ["http://cdn/a.jpg"]},
                    {"id": 43, "status": "ingesting"}
                ]))
            }),
        );
        let client = client_for(serve(router).await);

        let jobs = client.list_catalog_jobs().await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id, 42);
        assert_eq!(jobs[0].status, JobStatus::Complete);
        assert_eq!(jobs[1].status, JobStatus::Ingesting);
    }

    #[tokio::test]
    async fn test_list_product_jobs() {
        let router = Router::new().route(
            "/product",
            get(|| async {
                Json(json!([
                    {"id": 7, "input_id": 542, "status": "ingesting"}
                ]))
            }),
        );
        let client = client_for(serve(router).await);

        let jobs = client.list_product_jobs().await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].input_id, 542);
    }

    #[tokio::test]
    async fn test_non_200_is_api_error() {
        let router = Router::new().route(
            "/input",
            get(|| async { (AxumStatus::SERVICE_UNAVAILABLE, "maintenance") }),
        );
        let client = client_for(serve(router).await);

        let err = client.list_catalog_jobs().await.unwrap_err();
        match err {
            StatusApiError::ApiError { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("Expected ApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_other_success_codes_are_rejected() {
        let router = Router::new().route(
            "/product",
            get(|| async { (AxumStatus::ACCEPTED, Json(json!([]))) }),
        );
        let client = client_for(serve(router).await);

        let err = client.list_product_jobs().await.unwrap_err();
        assert!(matches!(err, StatusApiError::ApiError { status: 202, .. }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let router = Router::new().route("/input", get(|| async { "not json" }));
        let client = client_for(serve(router).await);

        let err = client.list_catalog_jobs().await.unwrap_err();
        assert!(matches!(err, StatusApiError::ParseError(_)));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = client_for("http://localhost:3000/".to_string());
        assert_eq!(client.base_url(), "http://localhost:3000");
    }
}
