use crate::parse::common::{
    is_identifier, last_segment, squash_whitespace, ImportKind, ImportRecord, LineSpan,
};
use crate::parse::ImportGrammar;
use once_cell::sync::Lazy;
use regex::Regex;

static REQUIRE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*require\(\s*['"]([^'"]+)['"]\s*\)\s*;?$"#)
        .expect("require regex should be valid")
});

static DOTTED_IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^import\s+([A-Za-z_][\w]*(?:\.[A-Za-z_][\w]*)*)(?:\s+as\s+([A-Za-z_]\w*))?\s*;?$")
        .expect("dotted import regex should be valid")
});

static QUOTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"]([^'"]+)['"]"#).expect("quoted regex should be valid"));

const KEYWORDS: &[&str] = &[
    "import ", "from ", "use ", "using ", "require ", "require(", "include ", "#include", "load(",
];

/// Catch-all adapter for languages without a dedicated grammar. It records
/// anything it recognizes as a side-effect import unless a binding is
/// syntactically obvious.
pub struct GenericGrammar;

impl ImportGrammar for GenericGrammar {
    fn id(&self) -> &'static str {
        "generic"
    }

    fn language_ids(&self) -> &'static [&'static str] {
        &["*"]
    }

    fn recognizes_statement(&self, line: &str) -> bool {
        let t = line.trim_start();
        KEYWORDS.iter().any(|kw| t.starts_with(kw)) || REQUIRE_RE.is_match(t.trim_end())
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
        let normalized = squash_whitespace(text);
        if let Some(caps) = REQUIRE_RE.captures(&normalized) {
            return Some(ImportRecord::new(
                ImportKind::Default,
                vec![caps[1].to_string()],
                &caps[2],
                text,
                span,
            ));
        }
        if let Some(caps) = DOTTED_IMPORT_RE.captures(&normalized) {
            let path = &caps[1];
            let binding = caps
                .get(2)
                .map_or_else(|| last_segment(path).to_string(), |m| m.as_str().to_string());
            if is_identifier(&binding) {
                return Some(ImportRecord::new(
                    ImportKind::Namespace,
                    vec![binding],
                    path,
                    text,
                    span,
                ));
            }
        }
        let source = QUOTED_RE
            .captures(&normalized)
            .map(|caps| caps[1].to_string())
            .unwrap_or_default();
        Some(ImportRecord::side_effect(source, text, span))
    }

    fn side_effect_hint(&self, _record: &ImportRecord) -> bool {
        false
    }
}
