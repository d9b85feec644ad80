use crate::copy_fixture;
use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;

const FIXED_APP: &str = "from __future__ import annotations
import sys
from typing import List, Dict


def process(items: List[str]) -> Dict[str, int]:
    result: Dict[str, int] = {}
    for item in items:
        result[item] = len(item)
    print(len(items), file=sys.stderr)
    return result
";

#[test]
fn dry_run_leaves_files_untouched() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixture("python", dir.path());
    let app = dir.path().join("app.py");
    let before = std::fs::read_to_string(&app).unwrap();

    let mut cmd = Command::cargo_bin("importsweep").unwrap();
    cmd.args(["fix", dir.path().to_str().unwrap(), "--dry-run", "--quiet"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Would edit app.py"))
        .stdout(predicate::str::contains("remove line 2"))
        .stdout(predicate::str::contains(
            "rewrite line 5 -> from typing import List, Dict",
        ))
        .stdout(predicate::str::contains("3 of 3 unused imports planned"));

    assert_eq!(std::fs::read_to_string(&app).unwrap(), before);
}

#[test]
fn fix_rewrites_python() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixture("python", dir.path());

    let mut cmd = Command::cargo_bin("importsweep").unwrap();
    cmd.args(["fix", dir.path().to_str().unwrap(), "--quiet"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Edited app.py"));

    let fixed = std::fs::read_to_string(dir.path().join("app.py")).unwrap();
    assert_eq!(fixed, FIXED_APP);

    // A second pass has nothing left to do.
    let mut again = Command::cargo_bin("importsweep").unwrap();
    again.args(["check", dir.path().to_str().unwrap(), "--quiet"]);
    again.assert().success();
}

#[test]
fn fix_go_block_keeps_used_imports() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixture("go", dir.path());

    let mut cmd = Command::cargo_bin("importsweep").unwrap();
    cmd.args(["fix", dir.path().to_str().unwrap(), "--quiet"]);
    cmd.assert().success();

    let fixed = std::fs::read_to_string(dir.path().join("main.go")).unwrap();
    assert!(fixed.contains("\"fmt\""));
    assert!(fixed.contains("\"strings\""));
    assert!(!fixed.contains("\"time\""));
}

#[test]
fn fix_json_reports_plan() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixture("typescript", dir.path());

    let mut cmd = Command::cargo_bin("importsweep").unwrap();
    cmd.args([
        "fix",
        dir.path().to_str().unwrap(),
        "--dry-run",
        "--format",
        "json",
        "--quiet",
    ]);
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["dryRun"], true);
    assert_eq!(json["summary"]["appliedCount"], 2);
    assert_eq!(json["summary"]["status"], "ready");
    assert_eq!(json["edits"].as_array().unwrap().len(), 2);
}

#[test]
fn min_confidence_skips_everything() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixture("python", dir.path());
    let app = dir.path().join("app.py");
    let before = std::fs::read_to_string(&app).unwrap();

    let mut cmd = Command::cargo_bin("importsweep").unwrap();
    cmd.args([
        "fix",
        dir.path().to_str().unwrap(),
        "--min-confidence",
        "0.95",
        "--quiet",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("skipped 0 side-effect, 3 low-confidence"));

    assert_eq!(std::fs::read_to_string(&app).unwrap(), before);
}
