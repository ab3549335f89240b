//! Binary-level smoke tests.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn devserve() -> Command {
    let mut cmd = Command::cargo_bin("devserve").unwrap();
    // Keep host environment variables from leaking into merged config.
    cmd.env_remove("DEVSERVE_PORT")
        .env_remove("DEVSERVE_HOST")
        .env_remove("DEVSERVE_COMMAND")
        .env_remove("DEVSERVE_STATIC_DIR")
        .env_remove("DEVSERVE_DEBOUNCE_MS")
        .env_remove("DEVSERVE_GRACE_PERIOD_MS");
    cmd
}

#[test]
fn help_lists_the_commands() {
    devserve()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn version_flag_works() {
    devserve()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("devserve"));
}

#[test]
fn check_accepts_a_valid_config_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("devserve.toml"),
        "command = \"echo hello\"\nport = 4000\n",
    )
    .unwrap();

    devserve()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("echo hello"))
        .stdout(predicate::str::contains("4000"));
}

#[test]
fn check_rejects_an_empty_configuration() {
    let dir = TempDir::new().unwrap();

    devserve()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to do"));
}

#[test]
fn check_reports_a_missing_explicit_config() {
    let dir = TempDir::new().unwrap();

    devserve()
        .current_dir(dir.path())
        .args(["check", "--config", "missing.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn serve_fails_fast_on_a_missing_static_dir() {
    let dir = TempDir::new().unwrap();

    devserve()
        .current_dir(dir.path())
        .args(["serve", "--static-dir", "does-not-exist", "--no-watch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("static directory"));
}

#[test]
fn serve_rejects_an_unsupported_config_format() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("devserve.ini"), "port = 1\n").unwrap();

    devserve()
        .current_dir(dir.path())
        .args(["serve", "--config", "devserve.ini"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported configuration format"));
}
