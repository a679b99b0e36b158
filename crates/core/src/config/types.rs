use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub aws: AwsConfig,
    pub storage: StorageConfig,
    pub status_api: StatusApiConfig,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub setup: SetupConfig,
    #[serde(default)]
    pub poll: PollConfig,
}

/// AWS / S3 client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AwsConfig {
    /// AWS region (e.g., "eu-west-2")
    pub region: String,
    /// Custom endpoint for S3-compatible stores (LocalStack, MinIO)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    /// Use path-style addressing (required by most S3-compatible stores)
    #[serde(default)]
    pub force_path_style: bool,
}

/// Bucket configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Bucket the pipeline ingests seed files from
    pub bucket_name: String,
    /// Bucket holding the daily markers
    pub test_data_bucket_name: String,
}

/// Status API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatusApiConfig {
    /// Base URL, without the trailing collection (e.g., "https://status.example.com")
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

/// Local artifacts configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtifactsConfig {
    /// Directory under which per-run asset folders are created
    #[serde(default = "default_artifacts_root")]
    pub root: PathBuf,
    /// Total time allowed for one asset download, in seconds (default: 300)
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            root: default_artifacts_root(),
            download_timeout_secs: default_download_timeout(),
        }
    }
}

impl ArtifactsConfig {
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

fn default_download_timeout() -> u64 {
    300 // 5 minutes
}

fn default_artifacts_root() -> PathBuf {
    PathBuf::from("artifacts")
}

/// Daily setup configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SetupConfig {
    /// Seed file uploaded to start a catalog job
    #[serde(default = "default_seed_file")]
    pub seed_file: PathBuf,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            seed_file: default_seed_file(),
        }
    }
}

fn default_seed_file() -> PathBuf {
    PathBuf::from("grumpycat.jpg")
}

/// Long-poll configuration for the watch scenario
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollConfig {
    /// Wall-clock budget per polled stage, in seconds (default: 180)
    #[serde(default = "default_budget")]
    pub budget_secs: u64,
    /// Delay between attempts, in seconds (default: 10)
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
}

fn default_budget() -> u64 {
    180 // 3 minutes
}

fn default_interval() -> u64 {
    10
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            budget_secs: default_budget(),
            interval_secs: default_interval(),
        }
    }
}

impl PollConfig {
    pub fn budget(&self) -> Duration {
        Duration::from_secs(self.budget_secs)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[aws]
region = "eu-west-2"

[storage]
bucket_name = "pipeline-input"
test_data_bucket_name = "pipeline-test-data"

[status_api]
base_url = "https://status.example.com"
"#;

    #[test]
    fn test_deserialize_minimal_config() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.aws.region, "eu-west-2");
        assert!(config.aws.endpoint_url.is_none());
        assert!(!config.aws.force_path_style);
        assert_eq!(config.storage.bucket_name, "pipeline-input");
        assert_eq!(config.storage.test_data_bucket_name, "pipeline-test-data");
        assert_eq!(config.status_api.timeout_secs, 30);
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.artifacts.root.to_str().unwrap(), "artifacts");
        assert_eq!(config.artifacts.download_timeout(), Duration::from_secs(300));
        assert_eq!(config.setup.seed_file.to_str().unwrap(), "grumpycat.jpg");
        assert_eq!(config.poll.budget(), Duration::from_secs(180));
        assert_eq!(config.poll.interval(), Duration::from_secs(10));
    }

    #[test]
    fn test_deserialize_missing_storage_fails() {
        let toml = r#"
[aws]
region = "eu-west-2"

[status_api]
base_url = "https://status.example.com"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[aws]
region = "us-east-1"
endpoint_url = "http://localhost:4566"
force_path_style = true

[storage]
bucket_name = "in"
test_data_bucket_name = "markers"

[status_api]
base_url = "http://localhost:3000"
timeout_secs = 5

[artifacts]
root = "/tmp/probe-artifacts"
download_timeout_secs = 900

[setup]
seed_file = "fixtures/seed.png"

[poll]
budget_secs = 60
interval_secs = 2
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.aws.endpoint_url.as_deref(),
            Some("http://localhost:4566")
        );
        assert!(config.aws.force_path_style);
        assert_eq!(config.status_api.timeout_secs, 5);
        assert_eq!(
            config.artifacts.root.to_str().unwrap(),
            "/tmp/probe-artifacts"
        );
        assert_eq!(config.artifacts.download_timeout_secs, 900);
        assert_eq!(config.setup.seed_file.to_str().unwrap(), "fixtures/seed.png");
        assert_eq!(config.poll.budget_secs, 60);
        assert_eq!(config.poll.interval_secs, 2);
    }
}
