//! Argument-surface tests for the mlws binary.
//!
//! These never reach a cloud backend: each case fails or exits before the
//! provider is constructed.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const WORKSPACE_ARGS: &[&str] = &[
    "--subscription-id",
    "sub-123",
    "--resource-group",
    "rg",
    "--workspace-name",
    "demo",
];

/// mlws command isolated from the caller's config and log settings.
fn mlws(temp_dir: &TempDir) -> Result<Command> {
    let mut cmd = Command::cargo_bin("mlws")?;
    cmd.env("MLWS_CONFIG", temp_dir.path().join("absent.yaml"))
        .env("MLWS_LOG_OUTPUT", "none")
        .env_remove("MLWS_REGION")
        .env_remove("MLWS_RECLAIM_MAX_ATTEMPTS")
        .env_remove("MLWS_RECLAIM_DELAY_SECS");
    Ok(cmd)
}

#[test]
fn test_help_lists_subcommands() -> Result<()> {
    let temp_dir = TempDir::new()?;
    mlws(&temp_dir)?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("destroy"))
        .stdout(predicate::str::contains("status"));
    Ok(())
}

#[test]
fn test_destroy_help_documents_group_flag() -> Result<()> {
    let temp_dir = TempDir::new()?;
    mlws(&temp_dir)?
        .args(["destroy", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--delete-resource-group"))
        .stdout(predicate::str::contains("--purge-vault"));
    Ok(())
}

#[test]
fn test_missing_workspace_name_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    mlws(&temp_dir)?
        .args(["create", "--subscription-id", "sub", "--resource-group", "rg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--workspace-name"));
    Ok(())
}

#[test]
fn test_missing_explicit_config_fails() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let missing = temp_dir.path().join("nope.yaml");
    mlws(&temp_dir)?
        .arg("--config")
        .arg(&missing)
        .arg("status")
        .args(WORKSPACE_ARGS)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nope.yaml"));
    Ok(())
}

#[test]
fn test_zero_max_attempts_fails_validation() -> Result<()> {
    let temp_dir = TempDir::new()?;
    mlws(&temp_dir)?
        .arg("create")
        .args(WORKSPACE_ARGS)
        .args(["--max-attempts", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("max_attempts"));
    Ok(())
}

#[test]
fn test_invalid_config_file_fails() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, "reclaim:\n  max_attempts: [1, 2]\n")?;

    mlws(&temp_dir)?
        .arg("--config")
        .arg(&config_path)
        .arg("destroy")
        .args(WORKSPACE_ARGS)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config.yaml"));
    Ok(())
}
