//! Smoke tests for the verdant CLI
//!
//! These tests verify basic CLI functionality works correctly.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a command for the verdant binary
fn verdant() -> Command {
    let mut cmd = Command::cargo_bin("verdant").expect("verdant binary should exist");
    cmd.env_remove("RUST_LOG").env_remove("ENV_VARS");
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    verdant()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.4.1"));
}

#[test]
fn test_help_flag() {
    verdant()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("layout"))
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("region"));
}

#[test]
fn test_no_args_fails() {
    verdant().assert().failure();
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_layout_text() {
    verdant()
        .args(["--color", "never", "layout", "--lat", "45.844", "--lon", "-0.808", "-n", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lat 45.84400  Lon -0.80800"))
        .stdout(predicate::str::contains("Lat 45.86400"));
}

#[test]
fn test_layout_json_has_twenty_rows_by_default() {
    let output = verdant()
        .args(["layout", "--lat", "47.91341", "--lon", "14.89598", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 20);
    assert_eq!(rows[19]["lane"], "West");
}

#[test]
fn test_layout_rejects_too_many() {
    verdant()
        .args(["layout", "--lat", "1", "--lon", "1", "-n", "21"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: Invalid argument"));
}

#[test]
fn test_layout_rejects_nan_base() {
    verdant()
        .args(["layout", "--lat", "NaN", "--lon", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid coordinates"));
}

// ============================================================================
// Parse
// ============================================================================

#[test]
fn test_parse_label() {
    verdant()
        .args(["parse", "Lat: 45.844°"])
        .assert()
        .success()
        .stdout("45.844\n");
}

#[test]
fn test_parse_negative() {
    verdant()
        .args(["parse", "-0.808"])
        .assert()
        .success()
        .stdout("-0.808\n");
}

#[test]
fn test_parse_invalid() {
    verdant()
        .args(["parse", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(r#"Error: Invalid coordinate value: "abc""#));
}

// ============================================================================
// Environment
// ============================================================================

#[test]
fn test_env_default_is_preprod() {
    verdant()
        .args(["--color", "never", "env"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://preprod.mainpage.com"));
}

#[test]
fn test_env_from_env_vars() {
    verdant()
        .env("ENV_VARS", "dev")
        .args(["--color", "never", "env"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Development"));
}

#[test]
fn test_env_flag_wins() {
    verdant()
        .env("ENV_VARS", "dev")
        .args(["--color", "never", "env", "--env", "QA"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://qa.mainpage.com"));
}

#[test]
fn test_env_invalid() {
    verdant()
        .args(["env", "--env", "staging"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid environment: staging"));
}

// ============================================================================
// Fixtures
// ============================================================================

#[test]
fn test_zone_lookup() {
    verdant()
        .args(["--color", "never", "zone", "No Bidding Zone (Austria)"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lat 47.91341  Lon 14.89598"));
}

#[test]
fn test_zone_list() {
    verdant()
        .args(["--color", "never", "zone"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 Bidding Zone (France)"))
        .stdout(predicate::str::contains("2 Bidding Zones (Andorra)"));
}

#[test]
fn test_zone_unknown() {
    verdant()
        .args(["zone", "Atlantis"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown bidding zone: Atlantis"));
}

#[test]
fn test_region_is_reproducible_with_seed() {
    let run = || {
        verdant()
            .args(["--color", "never", "region", "europe", "--seed", "42"])
            .output()
            .unwrap()
    };
    let first = run();
    let second = run();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
    assert!(String::from_utf8_lossy(&first.stdout).contains("(seed 42)"));
}

#[test]
fn test_region_unknown() {
    verdant()
        .args(["region", "antarctica"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Available regions: europe, asia, america"));
}

#[test]
fn test_config_defaults() {
    verdant()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"recovery_backoff_ms\": 500"));
}

#[test]
fn test_config_missing_file() {
    verdant()
        .args(["config", "--file", "/definitely/not/here.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}
