#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::process::Command;

fn segrouter() -> Command {
    Command::new(env!("CARGO_BIN_EXE_segrouter"))
}

#[test]
fn test_cli_check_prints_one_line_per_path() {
    let output = segrouter()
        .args(["check", "--pattern", "/users/{int}", "/users/7", "/users/7/posts", "/users/bob"])
        .output()
        .expect("run cli");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "/users/7\tmatch=true\texact=true",
            "/users/7/posts\tmatch=true\texact=false",
            "/users/bob\tmatch=false\texact=false",
        ]
    );
}

#[test]
fn test_cli_check_rejects_unknown_placeholder() {
    let output = segrouter()
        .args(["check", "--pattern", "/users/{uuid}", "/users/1"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid pattern"), "stderr: {stderr}");
}

#[test]
fn test_cli_serve_rejects_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("server.yaml");
    std::fs::write(&config, "workers: 0\n").unwrap();

    let output = segrouter()
        .arg("serve")
        .arg("--config")
        .arg(&config)
        .env_remove("SEGR_WORKERS")
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("workers"), "stderr: {stderr}");
}
