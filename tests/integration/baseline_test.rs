use crate::copy_fixture;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn importsweep(args: &[&str], dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("importsweep").unwrap();
    cmd.args(args).arg(dir).arg("--quiet");
    cmd
}

#[test]
fn generate_then_check_against_baseline() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixture("python", dir.path());

    importsweep(&["baseline", "generate"], dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "with 3 unused imports in 1 files",
        ));

    let saved = std::fs::read_to_string(dir.path().join(".importsweep-baseline.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(json["version"], "3.0.0");
    assert_eq!(json["metadata"]["totalUnusedImports"], 3);
    assert_eq!(json["entries"][0]["filePath"], "app.py");
    assert_eq!(json["history"].as_array().unwrap().len(), 0);

    importsweep(&["check", "--against-baseline"], dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[baseline]"))
        .stdout(predicate::str::contains("(0 new, 3 in baseline, 0 resolved)"));
}

#[test]
fn subdirectory_check_shares_project_keys() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join(".git")).unwrap();
    std::fs::create_dir(dir.path().join("src")).unwrap();
    std::fs::write(dir.path().join("src/a.py"), "import os\n").unwrap();
    importsweep(&["baseline", "generate"], dir.path()).assert().success();

    let saved = std::fs::read_to_string(dir.path().join(".importsweep-baseline.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(json["entries"][0]["filePath"], "src/a.py");

    for target in [dir.path().join("src"), dir.path().join("src/a.py")] {
        importsweep(&["check", "--against-baseline"], &target)
            .assert()
            .success()
            .stdout(predicate::str::contains("(0 new, 1 in baseline, 0 resolved)"));
    }
}

#[test]
fn new_import_fails_check() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixture("python", dir.path());
    importsweep(&["baseline", "generate"], dir.path()).assert().success();

    let app = dir.path().join("app.py");
    let mut text = std::fs::read_to_string(&app).unwrap();
    text.push_str("import re\n");
    std::fs::write(&app, text).unwrap();

    importsweep(&["check", "--against-baseline"], dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("unused import `import re`"))
        .stdout(predicate::str::contains("(1 new, 3 in baseline, 0 resolved)"));
}

#[test]
fn update_records_history() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixture("python", dir.path());
    importsweep(&["baseline", "generate"], dir.path()).assert().success();

    importsweep(&["baseline", "show"], dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Unused imports: 3 across 1 files"))
        .stdout(predicate::str::contains("No history recorded yet"));

    importsweep(&["fix"], dir.path()).assert().success();
    importsweep(&["baseline", "update"], dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated"))
        .stdout(predicate::str::contains("with 0 unused imports in 0 files"));

    importsweep(&["baseline", "show"], dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Unused imports: 0 across 0 files"))
        .stdout(predicate::str::contains("-3 imports, -1 files (1 snapshots)"));
}

#[test]
fn show_without_baseline() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("importsweep")
        .unwrap()
        .args(["baseline", "show"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No baseline at"));
}

#[test]
fn show_json() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixture("go", dir.path());
    importsweep(&["baseline", "generate"], dir.path()).assert().success();

    let output = Command::cargo_bin("importsweep")
        .unwrap()
        .args(["baseline", "show", "--format", "json"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["version"], "3.0.0");
    assert_eq!(json["trend"]["current"]["totalUnusedImports"], 1);
    assert_eq!(json["trend"]["snapshots"], 0);
}

#[test]
fn corrupt_baseline_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixture("python", dir.path());
    std::fs::write(dir.path().join(".importsweep-baseline.json"), "{ not json").unwrap();

    importsweep(&["check", "--against-baseline"], dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid baseline file"));
}
