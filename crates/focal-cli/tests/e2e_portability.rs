//! E2E tests for export/import: lossless round-trips between workspaces
//! and descriptive rejection of malformed payloads.

use assert_cmd::Command;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn focal_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("focal"));
    cmd.current_dir(dir);
    cmd.env("FOCAL_LOG", "error");
    cmd
}

fn init_workspace(dir: &Path) {
    focal_cmd(dir).args(["init"]).assert().success();
}

fn task_ids(dir: &Path) -> Vec<String> {
    let output = focal_cmd(dir)
        .args(["list", "--all", "--json"])
        .output()
        .expect("list");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    json["tasks"]
        .as_array()
        .expect("tasks")
        .iter()
        .map(|t| t["id"].as_str().expect("id").to_string())
        .collect()
}

#[test]
fn export_import_round_trips_between_workspaces() {
    let source = TempDir::new().expect("tempdir");
    init_workspace(source.path());

    focal_cmd(source.path())
        .args(["project", "add", "Deep Work", "--color", "#123456"])
        .assert()
        .success();
    focal_cmd(source.path())
        .args(["add", "write report", "--project", "deep-work", "--due", "2026-08-20"])
        .assert()
        .success();
    focal_cmd(source.path())
        .args(["add", "water plants"])
        .assert()
        .success();

    let backup = source.path().join("backup.json");
    focal_cmd(source.path())
        .args(["export", "--output", backup.to_str().expect("utf8 path")])
        .assert()
        .success();

    // Exported document has the contract's top-level keys.
    let text = std::fs::read_to_string(&backup).expect("read backup");
    let doc: Value = serde_json::from_str(&text).expect("valid JSON");
    for key in [
        "tasks",
        "projects",
        "categories",
        "dailyPlans",
        "workSchedule",
        "journalEntries",
        "exportDate",
        "version",
    ] {
        assert!(doc.get(key).is_some(), "missing top-level key {key}");
    }

    let target = TempDir::new().expect("tempdir");
    init_workspace(target.path());
    focal_cmd(target.path())
        .args(["import", backup.to_str().expect("utf8 path")])
        .assert()
        .success();

    let mut source_ids = task_ids(source.path());
    let mut target_ids = task_ids(target.path());
    source_ids.sort();
    target_ids.sort();
    assert_eq!(source_ids, target_ids, "ids survive the round trip");

    focal_cmd(target.path()).args(["check"]).assert().success();
}

#[test]
fn importing_into_the_same_workspace_is_a_noop_merge() {
    let dir = TempDir::new().expect("tempdir");
    init_workspace(dir.path());
    focal_cmd(dir.path()).args(["add", "one"]).assert().success();

    let backup = dir.path().join("self.json");
    focal_cmd(dir.path())
        .args(["export", "--output", backup.to_str().expect("utf8 path")])
        .assert()
        .success();

    let before = task_ids(dir.path());
    focal_cmd(dir.path())
        .args(["import", backup.to_str().expect("utf8 path")])
        .assert()
        .success();
    assert_eq!(task_ids(dir.path()), before, "same ids, no duplicates");
}

#[test]
fn unrecognized_payload_is_rejected_with_code() {
    let dir = TempDir::new().expect("tempdir");
    init_workspace(dir.path());

    let bogus = dir.path().join("bogus.json");
    std::fs::write(&bogus, "{\"unrelated\": true}").expect("write");

    focal_cmd(dir.path())
        .args(["import", bogus.to_str().expect("utf8 path")])
        .assert()
        .failure()
        .stderr(predicates::str::contains("E4001"));
}

#[test]
fn non_json_payload_is_rejected_with_description() {
    let dir = TempDir::new().expect("tempdir");
    init_workspace(dir.path());

    let garbage = dir.path().join("garbage.json");
    std::fs::write(&garbage, "not json at all").expect("write");

    focal_cmd(dir.path())
        .args(["import", garbage.to_str().expect("utf8 path")])
        .assert()
        .failure()
        .stderr(predicates::str::contains("not a focal export"));
}

#[test]
fn partial_payload_with_tasks_only_is_accepted() {
    let dir = TempDir::new().expect("tempdir");
    init_workspace(dir.path());

    let partial = dir.path().join("partial.json");
    std::fs::write(
        &partial,
        r#"{"tasks": [{"id": "3f0c8e7a-1111-4222-8333-444455556666", "title": "imported"}]}"#,
    )
    .expect("write");

    focal_cmd(dir.path())
        .args(["import", partial.to_str().expect("utf8 path")])
        .assert()
        .success();

    assert_eq!(task_ids(dir.path()).len(), 1);
}
