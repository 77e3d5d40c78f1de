#![allow(clippy::unwrap_used, clippy::expect_used)]

use http::StatusCode;
use segrouter::config::{ServerConfig, ENV_WORKERS};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_load_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("server.yaml");
    fs::write(
        &path,
        "bind: 0.0.0.0:9090\nworkers: 2\nfallback_status: 405\n",
    )
    .unwrap();

    let config = ServerConfig::load(&path).unwrap();
    assert_eq!(config.bind, "0.0.0.0:9090");
    assert_eq!(config.workers, 2);
    assert_eq!(config.fallback().unwrap(), StatusCode::METHOD_NOT_ALLOWED);
    config.validate().unwrap();
}

#[test]
fn test_partial_file_keeps_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("server.yaml");
    fs::write(&path, "workers: 16\n").unwrap();

    let config = ServerConfig::load(&path).unwrap();
    assert_eq!(config.workers, 16);
    assert_eq!(config.bind, ServerConfig::default().bind);
    assert_eq!(config.fallback_status, 404);
}

#[test]
fn test_empty_file_is_default() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.yaml");
    fs::write(&path, "").unwrap();
    assert_eq!(ServerConfig::load(&path).unwrap(), ServerConfig::default());
}

#[test]
fn test_missing_file_names_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.yaml");
    let err = ServerConfig::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("nope.yaml"));
}

#[test]
fn test_unknown_key_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("server.yaml");
    fs::write(&path, "bind: 127.0.0.1:1\nthreads: 3\n").unwrap();
    assert!(ServerConfig::load(&path).is_err());
}

#[test]
fn test_file_then_overrides_then_validate() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("server.yaml");
    fs::write(&path, "workers: 3\n").unwrap();

    let config = ServerConfig::load(&path)
        .unwrap()
        .apply_overrides(|key| (key == ENV_WORKERS).then(|| "0".to_string()))
        .unwrap();
    assert_eq!(config.workers, 0);
    assert!(config.validate().is_err());
}
