//! E2E tests for the daily planner, shift calendar, and weekly review.

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

#[test]
fn plan_blocks_and_task_assignment() {
    let dir = TempDir::new().expect("tempdir");
    init_workspace(dir.path());

    let output = focal_cmd(dir.path())
        .args(["add", "deep work session", "--json"])
        .output()
        .expect("add");
    let task: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let task_id = task["id"].as_str().expect("id");

    let output = focal_cmd(dir.path())
        .args([
            "plan", "block", "Morning focus", "--start", "09:00", "--end", "11:00", "--date",
            "2026-08-10", "--json",
        ])
        .output()
        .expect("plan block");
    assert!(output.status.success());
    let plan: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(plan["date"], "2026-08-10");
    let block_id = plan["blocks"][0]["id"].as_str().expect("block id").to_string();

    focal_cmd(dir.path())
        .args(["plan", "assign", &block_id, task_id, "--date", "2026-08-10"])
        .assert()
        .success();

    let output = focal_cmd(dir.path())
        .args(["plan", "show", "--date", "2026-08-10", "--json"])
        .output()
        .expect("plan show");
    let plan: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(plan["blocks"][0]["taskIds"][0], *task_id);

    // One plan per date: a second block lands on the same plan.
    focal_cmd(dir.path())
        .args([
            "plan", "block", "Email hour", "--start", "11:00", "--end", "12:00", "--date",
            "2026-08-10",
        ])
        .assert()
        .success();
    let output = focal_cmd(dir.path())
        .args(["plan", "show", "--date", "2026-08-10", "--json"])
        .output()
        .expect("plan show");
    let plan: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(plan["blocks"].as_array().expect("blocks").len(), 2);

    focal_cmd(dir.path())
        .args(["plan", "unblock", &block_id, "--date", "2026-08-10"])
        .assert()
        .success();
}

#[test]
fn inverted_block_times_are_rejected() {
    let dir = TempDir::new().expect("tempdir");
    init_workspace(dir.path());

    focal_cmd(dir.path())
        .args([
            "plan", "block", "Backwards", "--start", "11:00", "--end", "09:00",
        ])
        .assert()
        .failure()
        .stderr(predicates::str::contains("E2002"));
}

#[test]
fn shift_calendar_add_list_remove() {
    let dir = TempDir::new().expect("tempdir");
    init_workspace(dir.path());

    focal_cmd(dir.path())
        .args([
            "shift", "add", "--date", "2026-08-11", "--start", "08:00", "--end", "16:00",
            "--type", "day",
        ])
        .assert()
        .success();
    focal_cmd(dir.path())
        .args([
            "shift", "add", "--date", "2026-08-12", "--start", "22:00", "--end", "23:30",
            "--type", "night",
        ])
        .assert()
        .success();

    let output = focal_cmd(dir.path())
        .args(["shift", "list", "--date", "2026-08-11", "--json"])
        .output()
        .expect("shift list");
    let shifts: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let rows = shifts.as_array().expect("array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["shiftType"], "day");

    let id = rows[0]["id"].as_str().expect("id").to_string();
    focal_cmd(dir.path())
        .args(["shift", "remove", &id])
        .assert()
        .success();

    let output = focal_cmd(dir.path())
        .args(["shift", "list", "--json"])
        .output()
        .expect("shift list");
    let shifts: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(shifts.as_array().expect("array").len(), 1);
}

#[test]
fn weekly_review_flips_complete_on_the_fifth_section() {
    let dir = TempDir::new().expect("tempdir");
    init_workspace(dir.path());

    // Four of five sections in the same ISO week.
    for section in ["reflect", "overdue", "upcoming", "projects"] {
        focal_cmd(dir.path())
            .args([
                "journal", "add", "notes", "--section", section, "--date", "2026-08-05",
            ])
            .assert()
            .success();
    }

    let output = focal_cmd(dir.path())
        .args(["review", "--json"])
        .output()
        .expect("review");
    let review: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(review["complete"], false);
    assert_eq!(review["missing"][0], "life-areas");

    focal_cmd(dir.path())
        .args([
            "journal", "add", "balanced ok", "--section", "life-areas", "--date", "2026-08-05",
        ])
        .assert()
        .success();

    let output = focal_cmd(dir.path())
        .args(["review", "--json"])
        .output()
        .expect("review");
    let review: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(review["complete"], true);
    assert_eq!(review["week"], "2026-W32");
}

#[test]
fn review_tracks_the_most_recent_week_only() {
    let dir = TempDir::new().expect("tempdir");
    init_workspace(dir.path());

    focal_cmd(dir.path())
        .args([
            "journal", "add", "old", "--section", "reflect", "--date", "2026-07-01",
        ])
        .assert()
        .success();
    focal_cmd(dir.path())
        .args([
            "journal", "add", "new", "--section", "reflect", "--date", "2026-08-05",
        ])
        .assert()
        .success();

    let output = focal_cmd(dir.path())
        .args(["review", "--json"])
        .output()
        .expect("review");
    let review: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(review["week"], "2026-W32");
    assert_eq!(review["entries"], 1);
}

#[test]
fn empty_journal_reviews_cleanly() {
    let dir = TempDir::new().expect("tempdir");
    init_workspace(dir.path());

    focal_cmd(dir.path())
        .args(["review"])
        .assert()
        .success()
        .stdout(predicates::str::contains("No journal entries"));
}
