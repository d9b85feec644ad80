use crate::parse::common::{squash_whitespace, strip_line_comment, ImportKind, ImportRecord, LineSpan};
use crate::parse::explain::{ReasonTable, UnusedReason};
use crate::parse::ImportGrammar;
use once_cell::sync::Lazy;
use regex::Regex;

static USING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(global\s+)?using\s+(static\s+)?(?:([A-Za-z_]\w*)\s*=\s*)?([A-Za-z_][\w.]*(?:<[^;]*>)?)\s*;$",
    )
    .expect("using regex should be valid")
});

const REASONS: ReasonTable = &[("using directive is unnecessary", UnusedReason::NeverReferenced)];

/// `using` directives. Namespace imports bind no identifier, so the textual
/// usage scan cannot judge them.
pub struct CSharpGrammar;

impl ImportGrammar for CSharpGrammar {
    fn id(&self) -> &'static str {
        "csharp"
    }

    fn language_ids(&self) -> &'static [&'static str] {
        &["csharp", "cs"]
    }

    /// `using` followed by a name, excluding `using var` declarations and
    /// `using (...)` blocks.
    fn recognizes_statement(&self, line: &str) -> bool {
        let t = line.trim_start();
        let t = t.strip_prefix("global ").map(str::trim_start).unwrap_or(t);
        let Some(rest) = t.strip_prefix("using ") else {
            return false;
        };
        let rest = rest.trim_start();
        !rest.starts_with('(') && !rest.starts_with("var ")
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
        let Some(caps) = USING_RE.captures(&normalized) else {
            return Some(ImportRecord::unparsed(text, span));
        };
        let target = caps[4].to_string();
        let record = match caps.get(3) {
            Some(alias) => ImportRecord::new(
                ImportKind::Named,
                vec![alias.as_str().to_string()],
                target,
                text,
                span,
            ),
            None => ImportRecord::new(
                ImportKind::Namespace,
                vec![target.clone()],
                target,
                text,
                span,
            ),
        };
        Some(record)
    }

    fn continues(&self, text: &str) -> bool {
        let last = text.lines().last().unwrap_or_default();
        !strip_line_comment(last, "//").trim_end().ends_with(';')
    }

    fn side_effect_hint(&self, record: &ImportRecord) -> bool {
        let raw = record.raw_text().trim_start();
        raw.starts_with("global ")
            || raw.contains("using static ")
            || record.source().starts_with("System.Runtime.CompilerServices")
    }

    fn reason_table(&self) -> ReasonTable {
        REASONS
    }

    fn known_origins(&self) -> &'static [&'static str] {
        &["csharp", "roslyn", "omnisharp", "c#"]
    }

    fn unused_codes(&self) -> &'static [&'static str] {
        &["CS8019", "IDE0005"]
    }

    fn usage_scan(&self) -> bool {
        false
    }
}
