//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

fn folio() -> Command {
    let mut cmd = Command::cargo_bin("folio").unwrap();
    // Keep the caller's environment from leaking into flag defaults
    cmd.env_remove("DATABASE_URL")
        .env_remove("PORT")
        .env_remove("HOST")
        .env_remove("CORS_ORIGINS")
        .env_remove("LAZY_CONNECT");
    cmd
}

// === Help Tests ===

#[test]
fn test_help_lists_commands() {
    folio()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_serve_help() {
    folio()
        .arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Database URL"))
        .stdout(predicate::str::contains("--lazy-connect"));
}

#[test]
fn test_check_help() {
    folio()
        .arg("check")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--server-selection-timeout-ms"));
}

// === Failure Tests ===

#[test]
fn test_serve_requires_database_url() {
    folio()
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--database-url"));
}

#[test]
fn test_check_reports_bad_url() {
    folio()
        .arg("check")
        .arg("--database-url")
        .arg("not a database url")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Database check failed"));
}

#[test]
fn test_serve_eager_connect_failure_exits() {
    folio()
        .arg("serve")
        .arg("--port")
        .arg("0")
        .arg("--database-url")
        .arg("not a database url")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Server error"));
}
