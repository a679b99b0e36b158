use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Region and bucket names are not blank
/// - Status API base URL is http(s) and the timeout is not 0
/// - Asset download timeout is not 0
/// - Poll interval is not 0 and fits inside the poll budget
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.aws.region.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "aws.region cannot be empty".to_string(),
        ));
    }

    if config.storage.bucket_name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.bucket_name cannot be empty".to_string(),
        ));
    }

    if config.storage.test_data_bucket_name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.test_data_bucket_name cannot be empty".to_string(),
        ));
    }

    let base_url = &config.status_api.base_url;
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::ValidationError(format!(
            "status_api.base_url must be an http(s) URL, got '{}'",
            base_url
        )));
    }

    if config.status_api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "status_api.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.artifacts.download_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "artifacts.download_timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.poll.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "poll.interval_secs cannot be 0".to_string(),
        ));
    }

    if config.poll.interval_secs > config.poll.budget_secs {
        return Err(ConfigError::ValidationError(format!(
            "poll.interval_secs ({}) exceeds poll.budget_secs ({})",
            config.poll.interval_secs, config.poll.budget_secs
        )));
    }

    Ok(())
}
