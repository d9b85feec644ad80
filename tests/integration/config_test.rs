use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn config_show_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("importsweep").unwrap();
    cmd.args(["config", "show", "--path", tmp.path().to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Resolved settings:"))
        .stdout(predicate::str::contains("defaults.format: text <- default"))
        .stdout(predicate::str::contains("defaults.quiet: false <- default"))
        .stdout(predicate::str::contains("fix.safe_mode: true <- default"))
        .stdout(predicate::str::contains("session.debounce_ms: 500 <- default"));
}

#[test]
fn config_show_with_project_config() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join(".importsweep.toml"),
        r#"
[defaults]
format = "json"

[fix]
min_confidence = 0.8

[confidence]
base = 0.85
"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("importsweep").unwrap();
    cmd.args(["config", "show", "--path", tmp.path().to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(".importsweep.toml"))
        .stdout(predicate::str::contains(
            "defaults.format: json <- project config",
        ))
        .stdout(predicate::str::contains(
            "fix.min_confidence: 0.8 <- project config",
        ))
        .stdout(predicate::str::contains(
            "confidence.base: 0.85 <- project config",
        ))
        .stdout(predicate::str::contains("defaults.quiet: false <- default"));
}

#[test]
fn env_var_overrides_project_config() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join(".importsweep.toml"),
        "[defaults]\nformat = \"json\"\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("importsweep").unwrap();
    cmd.env("IMPORTSWEEP_FORMAT", "sarif");
    cmd.args(["config", "show", "--path", tmp.path().to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("defaults.format: sarif <- env var"));
}

#[test]
fn unknown_key_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join(".importsweep.toml"), "[rules]\nx = 1\n").unwrap();

    let mut cmd = Command::cargo_bin("importsweep").unwrap();
    cmd.args(["config", "show", "--path", tmp.path().to_str().unwrap()]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn project_config_format_applies_to_check() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join(".importsweep.toml"),
        "[defaults]\nformat = \"json\"\nquiet = true\n",
    )
    .unwrap();
    std::fs::write(tmp.path().join("a.py"), "import os\n").unwrap();

    let mut cmd = Command::cargo_bin("importsweep").unwrap();
    cmd.args(["check", tmp.path().to_str().unwrap()]);
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("\"newIssues\": 1"));
}
