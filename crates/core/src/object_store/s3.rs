//! S3-backed object store.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, ConfigLoader};
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::{debug, warn};

use super::{ObjectStore, ObjectStoreError, UploadedFile};
use crate::config::AwsConfig;

/// S3 object store.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Wrap an existing S3 client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the default credential chain and the configured
    /// region / endpoint.
    pub async fn from_config(config: &AwsConfig) -> Self {
        Self::from_loader(aws_config::defaults(BehaviorVersion::latest()), config).await
    }

    async fn from_loader(loader: ConfigLoader, config: &AwsConfig) -> Self {
        let mut loader = loader.region(Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style)
            .build();

        Self::new(Client::from_conf(s3_config))
    }
}

/// Hex MD5 of `content`, the ETag S3 returns for single-part, non-KMS uploads.
fn content_md5(content: &[u8]) -> String {
    format!("{:x}", md5::compute(content))
}

/// Drain a response body into a string. The stream is consumed here so the
/// underlying connection is released on every path.
async fn drain_to_string(body: ByteStream) -> Result<String, String> {
    let aggregated = body.collect().await.map_err(|e| e.to_string())?;
    String::from_utf8(aggregated.into_bytes().to_vec()).map_err(|e| e.to_string())
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        content: Vec<u8>,
    ) -> Result<UploadedFile, ObjectStoreError> {
        debug!("S3 put: s3://{}/{} ({} bytes)", bucket, key, content.len());

        let expected_etag = content_md5(&content);

        let output = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(content))
            .send()
            .await
            .map_err(|e| ObjectStoreError::Upload {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let e_tag = output
            .e_tag()
            .map(|tag| tag.trim_matches('"').to_string())
            .unwrap_or_default();

        if e_tag != expected_etag {
            warn!(
                "ETag for s3://{}/{} is {:?}, content MD5 is {}",
                bucket, key, e_tag, expected_etag
            );
        }

        Ok(UploadedFile {
            bucket_name: bucket.to_string(),
            file_name: key.to_string(),
            e_tag,
        })
    }

    async fn exists(&self, bucket: &str, key: &str) -> Result<bool, ObjectStoreError> {
        debug!("S3 head: s3://{}/{}", bucket, key);

        match self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                if err
                    .as_service_error()
                    .is_some_and(|service_err| service_err.is_not_found())
                {
                    return Ok(false);
                }
                Err(ObjectStoreError::Check {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                    message: DisplayErrorContext(&err).to_string(),
                })
            }
        }
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<String, ObjectStoreError> {
        debug!("S3 get: s3://{}/{}", bucket, key);

        let fetch_error = |message: String| ObjectStoreError::Fetch {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message,
        };

        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| fetch_error(DisplayErrorContext(&e).to_string()))?;

        drain_to_string(output.body).await.map_err(fetch_error)
    }
}
