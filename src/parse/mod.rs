pub mod c_family;
pub mod common;
pub mod csharp;
pub mod explain;
pub mod generic;
pub mod go;
pub mod java;
pub mod python;
pub mod registry;
pub mod rust;
pub mod typescript;

pub use common::{ImportKind, ImportRecord, LineSpan, UNKNOWN_SOURCE};
pub use registry::AdapterRegistry;

use crate::diagnostic::Marker;
use explain::{ReasonTable, UnusedReason};

/// Maximum number of lines a single import statement may span.
pub const MAX_STATEMENT_LINES: usize = 50;

/// Import grammar adapter: each supported language implements this.
///
/// Every method is pure. Parsing never panics; unparseable input yields
/// `None` and ambiguous input yields a side-effect record.
pub trait ImportGrammar: Send + Sync {
    /// Registry identifier, e.g. `"python"`.
    fn id(&self) -> &'static str;

    /// Language identifiers this adapter serves. `"*"` marks a catch-all.
    fn language_ids(&self) -> &'static [&'static str];

    /// Whether `line` begins an import statement.
    fn recognizes_statement(&self, line: &str) -> bool;

    /// Parse a statement. `text` is a single line or a caller-assembled
    /// multi-line statement starting at `start_line` (1-indexed).
    fn parse(&self, text: &str, start_line: usize, end_line: Option<usize>)
        -> Option<ImportRecord>;

    /// Line comment marker used when scanning code and balancing brackets.
    fn line_comment(&self) -> &'static str {
        "//"
    }

    /// Whether the statement assembled so far continues on the next line.
    fn continues(&self, text: &str) -> bool {
        text.trim_end().ends_with('\\') || common::bracket_depth(text, self.line_comment()) > 0
    }

    /// Source or symbol matches the adapter's curated side-effect patterns.
    fn side_effect_hint(&self, record: &ImportRecord) -> bool;

    /// Conservative judgement of whether removing `record` could change
    /// behavior.
    fn has_side_effects(&self, record: &ImportRecord) -> bool {
        record.kind() == ImportKind::SideEffect
            || record.is_wildcard()
            || self.side_effect_hint(record)
    }

    /// Language-specific message phrases, consulted before the common table.
    fn reason_table(&self) -> ReasonTable {
        &[]
    }

    fn reason(&self, marker: &Marker) -> UnusedReason {
        explain::classify(&marker.message, self.reason_table())
    }

    fn explain(&self, marker: &Marker, record: &ImportRecord, unused: &[String]) -> String {
        explain::render(
            self.reason(marker),
            record,
            unused,
            self.has_side_effects(record),
        )
    }

    /// Statement text with only `unused` removed. `None` means delete the
    /// whole statement.
    fn reconstruct_without(&self, _record: &ImportRecord, _unused: &[String]) -> Option<String> {
        None
    }

    /// Diagnostic origins known to be reliable for this language.
    fn known_origins(&self) -> &'static [&'static str] {
        &[]
    }

    /// Diagnostic codes meaning "declared but never used".
    fn unused_codes(&self) -> &'static [&'static str] {
        &[]
    }

    /// A line that ends a statement unrelated to imports; stops the upward
    /// search for an enclosing import.
    fn is_scan_barrier(&self, line: &str) -> bool {
        !self.recognizes_statement(line) && line.trim_end().ends_with(';')
    }

    /// Whether the textual usage heuristic can judge this language's bindings.
    fn usage_scan(&self) -> bool {
        true
    }

    /// Re-exports count as uses of their own bindings.
    fn is_reexport(&self, _record: &ImportRecord) -> bool {
        false
    }

    /// Tree-sitter grammar for identifier collection, when one is bundled.
    fn tree_sitter_language(&self) -> Option<tree_sitter::Language> {
        None
    }

    /// Tree-sitter node kinds whose identifiers are declarations, not uses.
    fn import_node_kinds(&self) -> &'static [&'static str] {
        &[]
    }
}

/// A statement assembled from consecutive source lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub text: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// Join continuation lines starting at `start_idx` (0-indexed) following the
/// grammar's continuation rule, bounded to `MAX_STATEMENT_LINES`.
pub fn collect_statement(grammar: &dyn ImportGrammar, lines: &[&str], start_idx: usize) -> Statement {
    let mut text = lines.get(start_idx).copied().unwrap_or_default().to_string();
    let mut end_idx = start_idx;
    while grammar.continues(&text)
        && end_idx + 1 < lines.len()
        && end_idx + 1 - start_idx < MAX_STATEMENT_LINES
    {
        end_idx += 1;
        text.push('\n');
        text.push_str(lines[end_idx]);
    }
    Statement {
        text,
        start_line: start_idx + 1,
        end_line: end_idx + 1,
    }
}

/// Parse the statement beginning at `start_idx`: the multi-line form first,
/// then the single line. A closed multi-line statement that cannot be
/// understood stays one unparsed record over its whole span; only a
/// statement that never closes falls back to its first line, so a runaway
/// lookahead never swallows unrelated lines.
pub fn parse_at(grammar: &dyn ImportGrammar, lines: &[&str], start_idx: usize) -> Option<ImportRecord> {
    let statement = collect_statement(grammar, lines, start_idx);
    if statement.end_line > statement.start_line {
        let span = LineSpan::new(statement.start_line, statement.end_line);
        if let Some(record) = grammar.parse(&statement.text, span.start, Some(span.end)) {
            if !record.has_unknown_source() {
                return Some(record);
            }
            if !grammar.continues(&statement.text) {
                return Some(ImportRecord::unparsed(statement.text, span));
            }
        }
    }
    let line = lines.get(start_idx)?;
    grammar.parse(line, start_idx + 1, None)
}

/// Every import statement in `text`, in source order.
pub fn collect_imports(grammar: &dyn ImportGrammar, text: &str) -> Vec<ImportRecord> {
    let lines: Vec<&str> = text.lines().collect();
    let mut records = Vec::new();
    let mut idx = 0;
    while idx < lines.len() {
        if grammar.recognizes_statement(lines[idx]) {
            if let Some(record) = parse_at(grammar, &lines, idx) {
                idx = record.span().end.max(idx + 1);
                records.push(record);
                continue;
            }
        }
        idx += 1;
    }
    records
}
