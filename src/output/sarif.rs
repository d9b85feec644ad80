use crate::errors::Result;
use crate::output::CheckReport;
use serde::Serialize;
use std::io::Write;

const RULE_ID: &str = "importsweep/unused-import";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLog {
    #[serde(rename = "$schema")]
    schema: String,
    version: String,
    runs: Vec<SarifRun>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifDriver {
    name: String,
    version: String,
    information_uri: String,
    rules: Vec<SarifRule>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRule {
    id: String,
    name: String,
    short_description: SarifMessage,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifResult {
    rule_id: String,
    level: String,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
    /// `new` or `unchanged` relative to the baseline file.
    baseline_state: String,
    properties: SarifProperties,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifProperties {
    confidence: f64,
    has_side_effects: bool,
}

#[derive(Debug, Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLocation {
    physical_location: SarifPhysicalLocation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifPhysicalLocation {
    artifact_location: SarifArtifactLocation,
    region: SarifRegion,
}

#[derive(Debug, Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRegion {
    start_line: usize,
    end_line: usize,
}

/// Write check output as SARIF 2.1.0.
pub fn write_sarif<W: Write>(writer: &mut W, report: &CheckReport) -> Result<()> {
    let results = report
        .findings
        .iter()
        .map(|finding| {
            let span = finding.record.import_record().span();
            SarifResult {
                rule_id: RULE_ID.to_string(),
                level: if finding.is_new { "warning" } else { "note" }.to_string(),
                message: SarifMessage {
                    text: format!("{}. {}", finding.message(), finding.record.explanation()),
                },
                locations: vec![SarifLocation {
                    physical_location: SarifPhysicalLocation {
                        artifact_location: SarifArtifactLocation {
                            uri: finding.path.clone(),
                        },
                        region: SarifRegion {
                            start_line: span.start,
                            end_line: span.end,
                        },
                    },
                }],
                baseline_state: if finding.is_new { "new" } else { "unchanged" }.to_string(),
                properties: SarifProperties {
                    confidence: finding.record.confidence(),
                    has_side_effects: finding.record.has_side_effects(),
                },
            }
        })
        .collect();

    let log = SarifLog {
        schema: "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/main/sarif-2.1/schema/sarif-schema-2.1.0.json".to_string(),
        version: "2.1.0".to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: "importsweep".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    information_uri: "https://github.com/importsweep/importsweep".to_string(),
                    rules: vec![SarifRule {
                        id: RULE_ID.to_string(),
                        name: "UnusedImport".to_string(),
                        short_description: SarifMessage {
                            text: "Import declares a dependency that is never used".to_string(),
                        },
                    }],
                },
            },
            results,
        }],
    };

    serde_json::to_writer_pretty(&mut *writer, &log)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::Comparison;
    use crate::output::fixtures;
    use std::path::PathBuf;

    #[test]
    fn sarif_marks_baseline_state() {
        let root = PathBuf::from("/repo");
        let fresh = fixtures::whole(&root, "app.py", 2, "import os");
        let old = fixtures::partial(&root, "web/a.ts", 1);
        let comparison = Comparison {
            new_issues: vec![&fresh],
            baseline_issues: vec![&old],
            resolved: 0,
        };
        let mut buf = Vec::new();
        write_sarif(&mut buf, &CheckReport::new(&root, &comparison)).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["version"], "2.1.0");
        let results = value["runs"][0]["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["baselineState"], "new");
        assert_eq!(results[0]["level"], "warning");
        assert_eq!(
            results[0]["locations"][0]["physicalLocation"]["region"]["startLine"],
            2
        );
        assert_eq!(results[1]["baselineState"], "unchanged");
        assert_eq!(results[1]["level"], "note");
    }
}
