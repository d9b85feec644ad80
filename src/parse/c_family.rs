use crate::parse::common::{strip_line_comment, ImportRecord, LineSpan};
use crate::parse::ImportGrammar;
use once_cell::sync::Lazy;
use regex::Regex;

static INCLUDE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*#\s*(?:include|import)\s*(?:<([^>]+)>|"([^"]+)")"#)
        .expect("include regex should be valid")
});

/// `#include` / `#import` directives for C, C++ and Objective-C. Headers can
/// define macros, so every include is a side-effect import.
pub struct CFamilyGrammar;

impl ImportGrammar for CFamilyGrammar {
    fn id(&self) -> &'static str {
        "c-family"
    }

    fn language_ids(&self) -> &'static [&'static str] {
        &["c", "cpp", "c++", "objective-c", "objective-cpp", "cuda-cpp"]
    }

    fn recognizes_statement(&self, line: &str) -> bool {
        let t = line.trim_start();
        t.strip_prefix('#')
            .map(str::trim_start)
            .is_some_and(|rest| rest.starts_with("include") || rest.starts_with("import"))
    }

    fn parse(
        &self,
        text: &str,
        start_line: usize,
        end_line: Option<usize>,
    ) -> Option<ImportRecord> {
        let first = text.lines().next()?;
        if !self.recognizes_statement(first) {
            return None;
        }
        let span = LineSpan::new(start_line, end_line.unwrap_or(start_line));
        let code = strip_line_comment(first, "//");
        let header = INCLUDE_RE
            .captures(code)
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str().to_string());
        Some(match header {
            Some(header) => ImportRecord::side_effect(header, text, span),
            None => ImportRecord::unparsed(text, span),
        })
    }

    fn side_effect_hint(&self, _record: &ImportRecord) -> bool {
        true
    }

    fn known_origins(&self) -> &'static [&'static str] {
        &["clangd", "clang-tidy", "clang", "cppcheck", "include-what-you-use", "iwyu"]
    }

    fn unused_codes(&self) -> &'static [&'static str] {
        &["unused-includes", "misc-include-cleaner"]
    }

    /// Any non-directive code line.
    fn is_scan_barrier(&self, line: &str) -> bool {
        let t = line.trim_start();
        !t.is_empty() && !t.starts_with('#') && !t.starts_with("//")
    }

    fn usage_scan(&self) -> bool {
        false
    }
}
