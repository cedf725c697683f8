//! Tests that drive the `logstore` binary end to end.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn logstore(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("logstore").expect("binary built");
    cmd.env_remove("RUST_LOG")
        .env_remove("LOGSTORE_TABLE")
        .env("LOGSTORE_DB", dir.path().join("logs.db"));
    cmd
}

fn write(dir: &TempDir, level: &str, message: &str) -> String {
    let output = logstore(dir)
        .args(["--format", "json", "write", "--level", level, "--message", message])
        .output()
        .expect("run write");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    value["id"].as_str().expect("id").to_string()
}

#[test]
fn help_lists_commands() {
    Command::cargo_bin("logstore")
        .expect("binary built")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("prune").and(predicate::str::contains("migrate")));
}

#[test]
fn migrate_creates_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    logstore(&dir)
        .arg("migrate")
        .assert()
        .success()
        .stdout("Table logs is ready (sqlite)\n");
    assert!(dir.path().join("logs.db").exists());
}

#[test]
fn write_get_delete_cycle() {
    let dir = tempfile::tempdir().expect("tempdir");
    let id = write(&dir, "error", "disk full");

    logstore(&dir)
        .args(["get", id.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Message:  disk full"))
        .stdout(predicate::str::contains("Level:    error"));

    logstore(&dir)
        .args(["delete", id.as_str()])
        .assert()
        .success()
        .stdout(format!("Deleted {id}\n"));

    logstore(&dir)
        .args(["get", id.as_str()])
        .assert()
        .success()
        .stdout(format!("Log entry not found: {id}\n"));

    // Deleting again still succeeds.
    logstore(&dir).args(["delete", id.as_str()]).assert().success();
}

#[test]
fn list_and_count_with_filters() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(&dir, "debug", "cache warmed");
    write(&dir, "debug", "cache debug dump");
    write(&dir, "error", "cache error");

    logstore(&dir)
        .args(["count", "--level", "debug"])
        .assert()
        .success()
        .stdout("2\n");

    logstore(&dir).arg("count").assert().success().stdout("3\n");

    logstore(&dir)
        .args(["count", "--message-contains", "cache", "--message-not-contains", "debug"])
        .assert()
        .success()
        .stdout("2\n");

    logstore(&dir)
        .args(["list", "--level-in", "error,fatal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cache error"))
        .stdout(predicate::str::contains("Total: 1 entry"));
}

#[test]
fn list_json_respects_limit() {
    let dir = tempfile::tempdir().expect("tempdir");
    for i in 0..5 {
        write(&dir, "info", &format!("m{i}"));
    }

    let output = logstore(&dir)
        .args(["--format", "json", "list", "--limit", "2"])
        .output()
        .expect("run list");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["entries"].as_array().map(Vec::len), Some(2));
}

#[test]
fn prune_removes_matching() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(&dir, "debug", "a");
    write(&dir, "debug", "b");
    write(&dir, "info", "c");

    logstore(&dir)
        .args(["prune", "--level", "debug"])
        .assert()
        .success()
        .stdout("Pruned 2 entries\n");

    logstore(&dir).arg("count").assert().success().stdout("1\n");
}

#[test]
fn prune_without_filter_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(&dir, "info", "keep me");

    logstore(&dir)
        .arg("prune")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid argument"));

    logstore(&dir).arg("count").assert().success().stdout("1\n");
}

#[test]
fn invalid_inputs_fail() {
    let dir = tempfile::tempdir().expect("tempdir");

    logstore(&dir)
        .args(["write", "--message", "x", "--context", "{oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--context is not valid JSON"));

    logstore(&dir)
        .args(["list", "--since", "someday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--since"));

    logstore(&dir)
        .args(["list", "--order-by", "no_such_column"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no_such_column"));

    logstore(&dir)
        .args(["list", "--offset=-3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("offset cannot be negative"));
}

#[test]
fn table_flag_and_env_select_table() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(&dir, "info", "in logs");

    logstore(&dir)
        .args(["--table", "audit", "count"])
        .assert()
        .success()
        .stdout("0\n");

    logstore(&dir)
        .env("LOGSTORE_TABLE", "audit")
        .args(["write", "--message", "in audit"])
        .assert()
        .success();

    logstore(&dir)
        .args(["--table", "audit", "count"])
        .assert()
        .success()
        .stdout("1\n");
    logstore(&dir).arg("count").assert().success().stdout("1\n");
}

#[test]
fn debug_flag_traces_statements() {
    let dir = tempfile::tempdir().expect("tempdir");
    logstore(&dir)
        .args(["--debug", "count"])
        .assert()
        .success()
        .stderr(predicate::str::contains("executing statement"));
}
