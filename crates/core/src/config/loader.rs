use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "PROBE_";

/// Load configuration from file with environment variable overrides.
///
/// Nested keys use a double underscore, e.g. `PROBE_STORAGE__BUCKET_NAME`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_layered(path, ENV_PREFIX)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn load_layered(path: &Path, env_prefix: &str) -> Result<Config, ConfigError> {
    // Toml::file treats a missing file as empty, which would surface as a
    // confusing "missing field" error.
    if !path.is_file() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(env_prefix).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FILE_CONFIG: &str = r#"
[aws]
region = "eu-west-1"

[storage]
bucket_name = "in"
test_data_bucket_name = "markers"

[status_api]
base_url = "http://localhost:3000"

[artifacts]
root = "out"
"#;

    fn config_file(contents: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", contents).unwrap();
        temp_file
    }

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[aws]
region = "eu-west-2"

[storage]
bucket_name = "in"
test_data_bucket_name = "markers"

[status_api]
base_url = "http://localhost:3000"
timeout_secs = 10
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.status_api.timeout_secs, 10);
        assert_eq!(config.poll.budget_secs, 180);
    }

    #[test]
    fn test_load_config_from_str_missing_aws() {
        let toml = r#"
[storage]
bucket_name = "in"
test_data_bucket_name = "markers"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
        assert!(err.to_string().contains("aws"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/probe.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(dir.path());
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let file = config_file(FILE_CONFIG);

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.aws.region, "eu-west-1");
        assert_eq!(config.artifacts.root.to_str().unwrap(), "out");
        assert_eq!(config.setup.seed_file.to_str().unwrap(), "grumpycat.jpg");
    }

    #[test]
    fn test_env_overrides_nested_keys() {
        // Prefix unique to this test so parallel tests never see it
        let prefix = "PROBE_LOADER_TEST_";
        std::env::set_var("PROBE_LOADER_TEST_STORAGE__BUCKET_NAME", "from-env");
        std::env::set_var("PROBE_LOADER_TEST_POLL__INTERVAL_SECS", "3");

        let file = config_file(FILE_CONFIG);
        let config = load_layered(file.path(), prefix).unwrap();

        std::env::remove_var("PROBE_LOADER_TEST_STORAGE__BUCKET_NAME");
        std::env::remove_var("PROBE_LOADER_TEST_POLL__INTERVAL_SECS");

        assert_eq!(config.storage.bucket_name, "from-env");
        assert_eq!(config.storage.test_data_bucket_name, "markers");
        assert_eq!(config.poll.interval_secs, 3);
    }
}
