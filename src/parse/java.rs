use crate::parse::common::{squash_whitespace, strip_line_comment, ImportKind, ImportRecord, LineSpan};
use crate::parse::explain::{ReasonTable, UnusedReason};
use crate::parse::ImportGrammar;
use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};

static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^import\s+(static\s+)?([A-Za-z_$][\w$]*(?:\s*\.\s*[A-Za-z_$][\w$]*)*)(\s*\.\s*\*)?\s*;$")
        .expect("java import regex should be valid")
});

static SIDE_EFFECT_SOURCES: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([r"^java\.sql\.Driver$", r"^org\.junit\.platform", r"^lombok(\.|$)"])
        .expect("side-effect source patterns should be valid")
});

const REASONS: ReasonTable = &[
    ("is never used", UnusedReason::NeverReferenced),
    ("collides with another import", UnusedReason::DuplicateImport),
];

pub struct JavaGrammar;

impl ImportGrammar for JavaGrammar {
    fn id(&self) -> &'static str {
        "java"
    }

    fn language_ids(&self) -> &'static [&'static str] {
        &["java"]
    }

    fn recognizes_statement(&self, line: &str) -> bool {
        line.trim_start().starts_with("import ")
    }

    fn parse(
        &self,
        text: &str,
        start_line: usize,
        end_line: Option<usize>,
    ) -> Option<ImportRecord> {
        if !self.recognizes_statement(text.lines().next()?) {
            return None;
        }
        let span = LineSpan::new(start_line, end_line.unwrap_or(start_line));
        let code: Vec<&str> = text.lines().map(|l| strip_line_comment(l, "//")).collect();
        let normalized = squash_whitespace(&code.join(" "));
        let Some(caps) = IMPORT_RE.captures(&normalized) else {
            return Some(ImportRecord::unparsed(text, span));
        };
        let path: String = caps[2].chars().filter(|c| !c.is_whitespace()).collect();
        if caps.get(3).is_some() {
            return Some(ImportRecord::side_effect(path, text, span).with_wildcard(true));
        }
        let (source, name) = match path.rsplit_once('.') {
            Some((source, name)) => (source.to_string(), name.to_string()),
            None => (path.clone(), path.clone()),
        };
        Some(ImportRecord::new(
            ImportKind::Named,
            vec![name],
            source,
            text,
            span,
        ))
    }

    /// Open until the `;` terminator.
    fn continues(&self, text: &str) -> bool {
        let last = text.lines().last().unwrap_or_default();
        !strip_line_comment(last, "//").trim_end().ends_with(';')
    }

    fn side_effect_hint(&self, record: &ImportRecord) -> bool {
        let full = format!("{}.{}", record.source(), record.symbols().join("."));
        SIDE_EFFECT_SOURCES.is_match(record.source()) || SIDE_EFFECT_SOURCES.is_match(&full)
    }

    fn reason_table(&self) -> ReasonTable {
        REASONS
    }

    fn known_origins(&self) -> &'static [&'static str] {
        &["java", "javac", "jdtls", "eclipse", "checkstyle", "pmd", "intellij"]
    }

    fn unused_codes(&self) -> &'static [&'static str] {
        &["268435844", "UnusedImports", "UnnecessaryImport"]
    }
}
