//! Smoke tests to verify command wiring and settings resolution

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary with a clean environment, run from an empty directory so no
/// stray `.env` or settings variable leaks in.
fn what2eat(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("what2eat").unwrap();
    cmd.env_clear().current_dir(dir.path());
    cmd
}

// === Help Tests ===

#[test]
fn test_root_help() {
    let dir = tempfile::tempdir().unwrap();
    what2eat(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("init-db"));
}

#[test]
fn test_serve_help() {
    let dir = tempfile::tempdir().unwrap();
    what2eat(&dir)
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Address to bind to"))
        .stdout(predicate::str::contains("127.0.0.1:8000"));
}

#[test]
fn test_config_show_help() {
    let dir = tempfile::tempdir().unwrap();
    what2eat(&dir)
        .args(["config", "show", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Print as JSON"));
}

// === Settings Tests ===

#[test]
fn test_unsupported_db_type_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    what2eat(&dir)
        .env("DB_TYPE", "mysql")
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported DB_TYPE 'mysql'"));
}

#[test]
fn test_config_show_redacts_secrets() {
    let dir = tempfile::tempdir().unwrap();
    what2eat(&dir)
        .env("DB_TYPE", "postgres")
        .env("DB_PASSWORD", "hunter2")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("db_type = \"postgres\""))
        .stdout(predicate::str::contains("postgres:***@localhost:5432/what2eat"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_config_file_then_environment() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("what2eat.toml"),
        "app_name = \"Lunch Picker\"\npool_size = 3\n",
    )
    .unwrap();

    what2eat(&dir)
        .env("POOL_SIZE", "7")
        .args(["--config", "what2eat.toml", "config", "show", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"app_name\": \"Lunch Picker\""))
        .stdout(predicate::str::contains("\"pool_size\": 7"))
        .stdout(predicate::str::contains("\"database_url\": \"sqlite:///"));
}

#[test]
fn test_init_db_creates_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    what2eat(&dir)
        .env("SQLITE_DB_PATH", "data/dishes.sqlite3")
        .arg("init-db")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tables ready"));

    assert!(dir.path().join("data/dishes.sqlite3").exists());
}
