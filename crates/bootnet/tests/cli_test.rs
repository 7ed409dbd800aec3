//! Integration tests for the `bootnet` CLI binary.
//!
//! These tests exercise argument parsing, round file validation verdicts,
//! exit codes, and config handling against temporary files only.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `bootnet` binary with env isolation.
///
/// Clears all `BOOTNET_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn bootnet_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("bootnet");
    cmd.env("HOME", "/tmp/bootnet-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/bootnet-cli-test-nonexistent")
        .env_remove("BOOTNET_OUTPUT")
        .env_remove("BOOTNET_CONFIG")
        .env_remove("BOOTNET_MANAGEMENT__IPV4_PREFIX")
        .env_remove("BOOTNET_MANAGEMENT__IPV6_PREFIX")
        .env_remove("BOOTNET_UPLINK__NAME")
        .env_remove("BOOTNET_DEFAULTS__OUTPUT")
        .env_remove("BOOTNET_DEFAULTS__COLOR")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn write_round(dir: &TempDir, file: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(file);
    std::fs::write(&path, contents).unwrap();
    path
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

const VALID_ROUND: &str = r#"
[local]
name = "micro01"

[systems.micro01]
address = "10.0.0.1"

[[systems.micro01.networks]]
name = "UPLINK"
type = "physical"
config = { "ipv4.gateway" = "10.234.0.1/16", "ipv4.ovn.ranges" = "10.234.0.100-10.234.0.200" }

[[systems.micro01.networks]]
name = "default"
type = "ovn"
config = { "ipv4.address" = "10.28.15.1/24" }

[systems.micro02]
address = "10.0.0.2"
"#;

const MANAGEMENT_CONFLICT_ROUND: &str = r#"
[local]
name = "micro01"
address = "10.0.0.1"

[systems.micro01]
address = "10.0.0.1"

[[systems.micro01.networks]]
name = "UPLINK"
type = "physical"
config = { "ipv4.gateway" = "10.0.0.254/24" }
"#;

const MALFORMED_ROUND: &str = r#"
[local]
name = "micro01"

[systems.micro01]
address = "10.0.0.1"

[[systems.micro01.networks]]
name = "UPLINK"
type = "physical"
config = { "ipv4.gateway" = "10.42.0.1/16", "ipv4.ovn.ranges" = "10.42.5.255-10.42.1.1" }
"#;

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = bootnet_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    bootnet_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("bootstrap")
            .and(predicate::str::contains("validate"))
            .and(predicate::str::contains("inspect")),
    );
}

#[test]
fn test_version_flag() {
    bootnet_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bootnet"));
}

#[test]
fn test_invalid_subcommand() {
    let output = bootnet_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    bootnet_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    bootnet_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_build_writes_man_pages_and_completions() {
    let out_dir = Path::new(env!("OUT_DIR"));
    for page in ["bootnet.1", "bootnet-validate.1", "bootnet-config-init.1"] {
        assert!(out_dir.join("man").join(page).is_file(), "missing man page {page}");
    }
    for script in ["bootnet.bash", "_bootnet", "bootnet.fish"] {
        assert!(out_dir.join("completions").join(script).is_file(), "missing completion {script}");
    }
}

// ── validate ────────────────────────────────────────────────────────

#[test]
fn test_validate_accepts_clean_round() {
    let dir = TempDir::new().unwrap();
    let round = write_round(&dir, "round.toml", VALID_ROUND);

    bootnet_cmd()
        .args(["validate", path_arg(&round), "--color", "never"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Network topology accepted")
                .and(predicate::str::contains("fresh bootstrap"))
                .and(predicate::str::contains("micro01, micro02")),
        );
}

#[test]
fn test_validate_json_report() {
    let dir = TempDir::new().unwrap();
    let round = write_round(&dir, "round.toml", VALID_ROUND);

    bootnet_cmd()
        .args(["-o", "json", "validate", path_arg(&round)])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""status": "accepted""#)
                .and(predicate::str::contains(r#""mode": "fresh-bootstrap""#)),
        );
}

#[test]
fn test_validate_management_conflict_exits_6() {
    let dir = TempDir::new().unwrap();
    let round = write_round(&dir, "round.toml", MANAGEMENT_CONFLICT_ROUND);

    let output = bootnet_cmd()
        .args(["-o", "json-compact", "validate", path_arg(&round)])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(6));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(r#""kind":"management-conflict""#), "{stdout}");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("10.0.0.1/24"), "{stderr}");
}

#[test]
fn test_validate_management_prefix_override() {
    let dir = TempDir::new().unwrap();
    let round = write_round(
        &dir,
        "round.toml",
        r#"
[local]
name = "micro01"

[systems.micro01]
address = "10.0.0.1"

[[systems.micro01.networks]]
name = "UPLINK"
type = "physical"
config = { "ipv4.gateway" = "10.0.1.1/24" }
"#,
    );

    bootnet_cmd()
        .args(["validate", path_arg(&round)])
        .assert()
        .success();

    // A /16 management network swallows the neighbouring uplink /24.
    bootnet_cmd()
        .args(["validate", path_arg(&round), "--mgmt-prefix4", "16"])
        .assert()
        .code(6);
}

#[test]
fn test_validate_rejects_out_of_range_prefix() {
    let dir = TempDir::new().unwrap();
    let round = write_round(&dir, "round.toml", VALID_ROUND);

    bootnet_cmd()
        .args(["validate", path_arg(&round), "--mgmt-prefix4", "33"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("management.ipv4_prefix"));
}

#[test]
fn test_validate_malformed_range_exits_2() {
    let dir = TempDir::new().unwrap();
    let round = write_round(&dir, "round.toml", MALFORMED_ROUND);

    bootnet_cmd()
        .args(["validate", path_arg(&round)])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("10.42.5.255-10.42.1.1"));
}

#[test]
fn test_validate_join_mode_skips_checks() {
    let dir = TempDir::new().unwrap();
    let round = write_round(&dir, "round.toml", MANAGEMENT_CONFLICT_ROUND);

    bootnet_cmd()
        .args(["-o", "plain", "validate", path_arg(&round), "--mode", "join"])
        .assert()
        .success()
        .stdout(predicate::str::contains("accepted"));
}

#[test]
fn test_validate_auto_mode_joins_when_local_is_absent() {
    let dir = TempDir::new().unwrap();
    let round = write_round(&dir, "round.toml", MANAGEMENT_CONFLICT_ROUND);

    bootnet_cmd()
        .args([
            "-o",
            "json",
            "validate",
            path_arg(&round),
            "--local",
            "micro09",
            "--local-address",
            "10.0.0.9",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""mode": "join-existing""#));
}

#[test]
fn test_validate_yaml_round() {
    let dir = TempDir::new().unwrap();
    let round = write_round(
        &dir,
        "round.yaml",
        "local:\n  name: micro01\nsystems:\n  micro01:\n    address: 10.0.0.1\n",
    );

    bootnet_cmd()
        .args(["-o", "plain", "validate", path_arg(&round)])
        .assert()
        .success()
        .stdout(predicate::str::contains("accepted"));
}

#[test]
fn test_validate_requires_local_name() {
    let dir = TempDir::new().unwrap();
    let round = write_round(&dir, "round.json", r#"{"systems": {}}"#);

    bootnet_cmd()
        .args(["validate", path_arg(&round)])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--local"));
}

#[test]
fn test_validate_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let round = write_round(&dir, "round.ini", VALID_ROUND);

    bootnet_cmd()
        .args(["validate", path_arg(&round)])
        .assert()
        .code(2);
}

#[test]
fn test_validate_missing_file() {
    bootnet_cmd()
        .args(["validate", "/tmp/bootnet-cli-test-nonexistent/round.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("round.toml"));
}

// ── inspect ─────────────────────────────────────────────────────────

#[test]
fn test_inspect_lists_candidates() {
    let dir = TempDir::new().unwrap();
    let round = write_round(&dir, "round.toml", VALID_ROUND);

    bootnet_cmd()
        .args(["-o", "plain", "inspect", path_arg(&round)])
        .assert()
        .success()
        .stdout("micro01\nmicro02\n");
}

#[test]
fn test_inspect_table_shows_facts() {
    let dir = TempDir::new().unwrap();
    let round = write_round(&dir, "round.toml", VALID_ROUND);

    bootnet_cmd()
        .args(["inspect", path_arg(&round)])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("10.234.0.1/16")
                .and(predicate::str::contains("10.234.0.100-10.234.0.200"))
                .and(predicate::str::contains("default=10.28.15.1/24")),
        );
}

#[test]
fn test_inspect_reports_malformed_values() {
    let dir = TempDir::new().unwrap();
    let round = write_round(&dir, "round.toml", MALFORMED_ROUND);

    bootnet_cmd()
        .args(["inspect", path_arg(&round)])
        .assert()
        .code(2);
}

// ── config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honours_flag() {
    bootnet_cmd()
        .args(["config", "path", "--config", "/tmp/bootnet-cli-test-nonexistent/c.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/bootnet-cli-test-nonexistent/c.toml"));
}

#[test]
fn test_config_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    bootnet_cmd()
        .args(["config", "init", "--config", path_arg(&path)])
        .assert()
        .success();
    assert!(path.exists());

    bootnet_cmd()
        .args(["config", "init", "--config", path_arg(&path)])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("--force"));

    bootnet_cmd()
        .args(["config", "init", "--force", "--config", path_arg(&path)])
        .assert()
        .success();
}

#[test]
fn test_config_show_reflects_file_and_env() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[management]\nipv4_prefix = 16\n").unwrap();

    bootnet_cmd()
        .args(["config", "show", "--config", path_arg(&path)])
        .env("BOOTNET_UPLINK__NAME", "ext0")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("ipv4_prefix = 16")
                .and(predicate::str::contains(r#"name = "ext0""#)),
        );
}

#[test]
fn test_config_uplink_name_changes_validation() {
    let dir = TempDir::new().unwrap();
    let round = write_round(&dir, "round.toml", MANAGEMENT_CONFLICT_ROUND);

    // With a different uplink name the conflicting network is not the uplink.
    bootnet_cmd()
        .args(["validate", path_arg(&round), "--uplink", "ext0"])
        .assert()
        .success();
}
