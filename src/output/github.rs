//! GitHub Actions workflow commands. New findings become `::warning`,
//! baselined ones `::notice`.

use crate::errors::Result;
use crate::output::CheckReport;
use std::io::Write;

fn escape_data(text: &str) -> String {
    text.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(text: &str) -> String {
    escape_data(text).replace(':', "%3A").replace(',', "%2C")
}

pub fn write_annotations<W: Write>(writer: &mut W, report: &CheckReport) -> Result<()> {
    for finding in &report.findings {
        let span = finding.record.import_record().span();
        let command = if finding.is_new { "warning" } else { "notice" };
        writeln!(
            writer,
            "::{command} file={},line={},endLine={},title={}::{}",
            escape_property(&finding.path),
            span.start,
            span.end,
            escape_property("Unused import"),
            escape_data(&format!(
                "{}. {}",
                finding.message(),
                finding.record.explanation()
            )),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::Comparison;
    use crate::output::fixtures;
    use std::path::PathBuf;

    #[test]
    fn one_command_per_finding() {
        let root = PathBuf::from("/repo");
        let fresh = fixtures::whole(&root, "pkg/app.py", 7, "import os");
        let old = fixtures::partial(&root, "a.ts", 1);
        let comparison = Comparison {
            new_issues: vec![&fresh],
            baseline_issues: vec![&old],
            resolved: 0,
        };
        let mut buf = Vec::new();
        write_annotations(&mut buf, &CheckReport::new(&root, &comparison)).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("::notice file=a.ts,line=1,endLine=1,"));
        assert!(lines[1].starts_with(
            "::warning file=pkg/app.py,line=7,endLine=7,title=Unused import::unused import `import os`"
        ));
    }

    #[test]
    fn escapes() {
        assert_eq!(escape_data("50%\nnext"), "50%25%0Anext");
        assert_eq!(escape_property("C:\\a,b"), "C%3A\\a%2Cb");
    }
}
