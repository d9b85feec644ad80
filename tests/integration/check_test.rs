use crate::fixture_path;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn check_json(fixture: &str) -> Value {
    let mut cmd = Command::cargo_bin("importsweep").unwrap();
    cmd.args([
        "check",
        fixture_path(fixture).to_str().unwrap(),
        "--format",
        "json",
        "--quiet",
    ]);
    let output = cmd.output().unwrap();
    assert_eq!(output.status.code(), Some(1), "findings are new issues");
    serde_json::from_slice(&output.stdout).unwrap()
}

fn findings(json: &Value) -> &Vec<Value> {
    json["findings"].as_array().unwrap()
}

#[test]
fn python_findings() {
    let json = check_json("python");
    let findings = findings(&json);
    assert_eq!(findings.len(), 3);

    let lines: Vec<u64> = findings.iter().map(|f| f["line"].as_u64().unwrap()).collect();
    assert_eq!(lines, vec![2, 4, 5]);

    assert_eq!(findings[0]["file"], "app.py");
    assert_eq!(findings[0]["statement"], "import os");
    assert_eq!(findings[0]["unusedSymbols"].as_array().unwrap().len(), 0);
    assert_eq!(findings[0]["status"], "new");
    assert_eq!(findings[0]["origin"], "importsweep");

    assert_eq!(findings[2]["source"], "typing");
    assert_eq!(findings[2]["unusedSymbols"], serde_json::json!(["Optional"]));

    assert_eq!(json["summary"]["filesScanned"], 1);
    assert_eq!(json["summary"]["total"], 3);
    assert_eq!(json["summary"]["newIssues"], 3);
}

#[test]
fn future_import_is_never_reported() {
    let json = check_json("python");
    assert!(findings(&json)
        .iter()
        .all(|f| f["source"] != "__future__"));
}

#[test]
fn go_block_reports_single_binding() {
    let json = check_json("go");
    let findings = findings(&json);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0]["line"], 6);
    assert_eq!(findings[0]["unusedSymbols"], serde_json::json!(["time"]));
}

#[test]
fn rust_skips_method_traits() {
    let json = check_json("rust");
    let findings = findings(&json);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0]["statement"], "use std::fs::File;");
}

#[test]
fn typescript_keeps_side_effect_imports() {
    let json = check_json("typescript");
    let findings = findings(&json);
    assert_eq!(findings.len(), 2);
    assert_eq!(findings[0]["file"], "src/index.ts");
    assert_eq!(findings[0]["unusedSymbols"], serde_json::json!(["writeFile"]));
    assert_eq!(findings[1]["source"], "path");
    assert!(findings.iter().all(|f| f["source"] != "./polyfills"));
}

#[test]
fn java_uses_token_scan() {
    let json = check_json("java");
    let lines: Vec<u64> = findings(&json)
        .iter()
        .map(|f| f["line"].as_u64().unwrap())
        .collect();
    assert_eq!(lines, vec![5, 6]);
}

#[test]
fn lang_filter_limits_files() {
    let dir = tempfile::tempdir().unwrap();
    crate::copy_fixture("python", &dir.path().join("py"));
    crate::copy_fixture("go", &dir.path().join("go"));

    let mut cmd = Command::cargo_bin("importsweep").unwrap();
    cmd.args([
        "check",
        dir.path().to_str().unwrap(),
        "--lang",
        "go",
        "--format",
        "json",
        "--quiet",
    ]);
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("go/main.go"))
        .stdout(predicate::str::contains("app.py").not());
}

#[test]
fn text_output() {
    let mut cmd = Command::cargo_bin("importsweep").unwrap();
    cmd.args(["check", fixture_path("python").to_str().unwrap(), "--quiet"]);
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("app.py"))
        .stdout(predicate::str::contains("unused import `import os`"))
        .stdout(predicate::str::contains("unused Optional from `typing`"))
        .stdout(predicate::str::contains(
            "Unused imports: 3 (3 new, 0 in baseline, 0 resolved)",
        ));
}

#[test]
fn github_annotations() {
    let mut cmd = Command::cargo_bin("importsweep").unwrap();
    cmd.args([
        "check",
        fixture_path("go").to_str().unwrap(),
        "--format",
        "github",
        "--quiet",
    ]);
    cmd.assert()
        .code(1)
        .stdout(predicate::str::starts_with("::warning file=main.go,line=3,endLine=7"));
}

#[test]
fn sarif_output() {
    let mut cmd = Command::cargo_bin("importsweep").unwrap();
    cmd.args([
        "check",
        fixture_path("rust").to_str().unwrap(),
        "--format",
        "sarif",
        "--quiet",
    ]);
    let output = cmd.output().unwrap();
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["version"], "2.1.0");
    let results = json["runs"][0]["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["ruleId"], "importsweep/unused-import");
    assert_eq!(results[0]["baselineState"], "new");
}

#[test]
fn host_markers_replace_scanner() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("f.ts"),
        "import { a, b } from './x';\n\nb();\n",
    )
    .unwrap();
    // The scanner would flag `a`; the host says `b`.
    std::fs::write(
        dir.path().join("markers.json"),
        r#"[{"file": "f.ts", "line": 1, "message": "'b' is declared but its value is never read.", "unnecessary": true, "origin": "ts", "code": "6133"}]"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("importsweep").unwrap();
    cmd.args([
        "check",
        dir.path().to_str().unwrap(),
        "--lang",
        "typescript",
        "--markers",
        dir.path().join("markers.json").to_str().unwrap(),
        "--format",
        "json",
        "--quiet",
    ]);
    let output = cmd.output().unwrap();
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    let findings = findings(&json);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0]["unusedSymbols"], serde_json::json!(["b"]));
    assert_eq!(findings[0]["confidence"], 0.99);
}
