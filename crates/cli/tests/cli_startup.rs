use std::io::Write;
use std::path::Path;
use std::process::Output;

use tempfile::NamedTempFile;

/// Run the probe binary with `PROBE_CONFIG` pointing at `config_path`.
async fn run_probe(config_path: &Path, args: &[&str]) -> Output {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_probe"))
        .env("PROBE_CONFIG", config_path)
        .env("RUST_LOG", "error")
        .env("NO_COLOR", "1")
        .args(args)
        .output()
        .await
        .expect("Failed to run probe")
}

#[tokio::test]
async fn test_help_lists_subcommands() {
    let output = tokio::process::Command::new(env!("CARGO_BIN_EXE_probe"))
        .arg("--help")
        .output()
        .await
        .expect("Failed to run probe");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for subcommand in ["setup", "scenario", "watch"] {
        assert!(stdout.contains(subcommand), "missing {subcommand} in help");
    }
}

#[tokio::test]
async fn test_missing_config_exits_non_zero() {
    let output = run_probe(Path::new("/nonexistent/probe.toml"), &["setup"]).await;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"), "stderr: {stderr}");
    assert!(output.stdout.is_empty());
}

#[tokio::test]
async fn test_invalid_config_exits_non_zero() {
    let mut config_file = NamedTempFile::new().expect("Failed to create temp file");
    write!(
        config_file,
        r#"
[aws]
region = "eu-west-2"

[storage]
bucket_name = ""
test_data_bucket_name = "pipeline-test-data"

[status_api]
base_url = "https://status.example.com"
"#
    )
    .expect("Failed to write config");

    let output = run_probe(config_file.path(), &["scenario"]).await;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Configuration validation failed"),
        "stderr: {stderr}"
    );
}
