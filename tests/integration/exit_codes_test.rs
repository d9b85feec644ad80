use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn clean_project_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("ok.py"), "import os\n\nprint(os.getcwd())\n").unwrap();

    let mut cmd = Command::cargo_bin("importsweep").unwrap();
    cmd.args(["check", dir.path().to_str().unwrap(), "--quiet"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Unused imports: 0"));
}

#[test]
fn new_issues_exit_one() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bad.py"), "import os\n").unwrap();

    let mut cmd = Command::cargo_bin("importsweep").unwrap();
    cmd.args(["check", dir.path().to_str().unwrap(), "--quiet"]);
    cmd.assert().code(1);
}

#[test]
fn missing_path_fails() {
    let mut cmd = Command::cargo_bin("importsweep").unwrap();
    cmd.args(["check", "/definitely/not/here", "--quiet"]);
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("No analyzable files"));
}

#[test]
fn directory_without_sources_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("README.md"), "# nothing\n").unwrap();

    let mut cmd = Command::cargo_bin("importsweep").unwrap();
    cmd.args(["check", dir.path().to_str().unwrap(), "--quiet"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No analyzable files"));
}

#[test]
fn ignore_file_excludes_paths() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("gen")).unwrap();
    std::fs::write(dir.path().join("gen").join("stub.py"), "import os\n").unwrap();
    std::fs::write(dir.path().join("ok.py"), "print(1)\n").unwrap();
    std::fs::write(dir.path().join(".importsweepignore"), "gen/\n").unwrap();

    let mut cmd = Command::cargo_bin("importsweep").unwrap();
    cmd.args(["check", dir.path().to_str().unwrap(), "--quiet"]);
    cmd.assert().success();
}

#[test]
fn exclude_flag_skips_findings() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.py"), "import os\n").unwrap();
    std::fs::write(dir.path().join("b.py"), "print(1)\n").unwrap();

    let mut cmd = Command::cargo_bin("importsweep").unwrap();
    cmd.args([
        "check",
        dir.path().to_str().unwrap(),
        "--exclude",
        "a.py",
        "--quiet",
    ]);
    cmd.assert().success();
}
