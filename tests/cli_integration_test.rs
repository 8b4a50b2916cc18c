use anyhow::Result;
use std::process::{Command, Output};
use tempfile::TempDir;

const BINARY: &str = env!("CARGO_BIN_EXE_stackup");

/// Run the binary in an empty directory with no STACKUP_* overrides
fn run_isolated(dir: &TempDir, args: &[&str]) -> Result<Output> {
    let mut command = Command::new(BINARY);
    command.current_dir(dir.path()).args(args);
    for (key, _) in std::env::vars() {
        if key.starts_with("STACKUP_") {
            command.env_remove(key);
        }
    }
    Ok(command.output()?)
}

fn deploy_args<'a>(extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec![
        "--name",
        "demo",
        "--templateurl",
        "https://example.com/template.json",
        "--params",
        "Env=prod",
    ];
    args.extend_from_slice(extra);
    args
}

#[test]
fn test_cli_help() {
    let output = Command::new(BINARY)
        .arg("--help")
        .output()
        .expect("Failed to run binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("CloudFormation stack"));
    assert!(stdout.contains("--name"));
    assert!(stdout.contains("--templateurl"));
    assert!(stdout.contains("--params"));
    assert!(stdout.contains("--usepreviousparam"));
    assert!(stdout.contains("--policy"));
    assert!(stdout.contains("--config"));
}

#[test]
fn test_cli_version() {
    let output = Command::new(BINARY)
        .arg("--version")
        .output()
        .expect("Failed to run binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("stackup"));
}

#[test]
fn test_missing_required_flags_exit_with_usage_error() -> Result<()> {
    let dir = TempDir::new()?;
    let output = run_isolated(&dir, &["--templateurl", "https://x", "--params", "A=1"])?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--name"));
    Ok(())
}

#[test]
fn test_unknown_policy_is_a_usage_error() -> Result<()> {
    let dir = TempDir::new()?;
    let output = run_isolated(&dir, &deploy_args(&["--policy", "sideways"]))?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("sideways"));
    Ok(())
}

#[test]
fn test_missing_config_file_fails_before_any_stack_call() -> Result<()> {
    let dir = TempDir::new()?;
    let missing = dir.path().join("nope.toml");
    let missing = missing.to_string_lossy().into_owned();
    let output = run_isolated(&dir, &deploy_args(&["--config", missing.as_str()]))?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"));
    Ok(())
}

#[test]
fn test_zero_wait_timeout_is_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    let output = run_isolated(&dir, &deploy_args(&["--wait-timeout", "0"]))?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid configuration"));
    assert!(!dir.path().join("error.log").exists());
    Ok(())
}
