//! Configuration loading and the CLI run context built from it.

use cortex_gate::cli::{Cli, RunContext};
use cortex_gate::config::ConfigLoader;
use cortex_gate::error::ApiError;
use clap::Parser;
use tempfile::TempDir;

fn write_config(temp: &TempDir, body: &str) -> std::path::PathBuf {
    let path = temp.path().join("config.toml");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_invalid_config_rejected_by_validation() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "[probe]\ntimeout_ms = 0\n\n[ollama]\nendpoint = \"localhost\"\n");

    let config = ConfigLoader::load_from_file(&path).unwrap();
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 2);

    match RunContext::new(Some(path)) {
        Err(ApiError::ConfigError(msg)) => {
            assert!(msg.contains("timeout_ms"));
            assert!(msg.contains("ollama"));
        }
        Err(other) => panic!("expected ConfigError, got {:?}", other),
        Ok(_) => panic!("expected ConfigError"),
    }
}

#[test]
fn test_missing_explicit_config_file_is_error() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope.toml");
    assert!(ConfigLoader::load_from_file(&missing).is_err());
}

#[tokio::test]
async fn test_run_context_uses_platform_overrides_and_data_dir() {
    let temp = TempDir::new().unwrap();
    let data_dir = temp.path().join("data");
    let body = format!(
        "[storage]\ndata_dir = {:?}\n\n[platform]\nos_override = \"windows\"\nremote_override = \"none\"\nwsl_available_override = true\n",
        data_dir.to_string_lossy()
    );
    let path = write_config(&temp, &body);

    let ctx = RunContext::new(Some(path.clone())).unwrap();
    let cli = Cli::try_parse_from([
        "cortex-gate",
        "--config",
        path.to_str().unwrap(),
        "platform",
        "--format",
        "json",
    ])
    .unwrap();
    let out = ctx.execute(&cli.command).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["verdict"]["tag"], "wsl");
    assert_eq!(value["verdict"]["supported"], true);
    assert!(data_dir.join("store").exists());
}
