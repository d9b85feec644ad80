use crate::confidence::{self, ConfidenceWeights, Signals};
use crate::diagnostic::{Marker, UnusedImportRecord};
use crate::parse::{parse_at, AdapterRegistry, ImportGrammar, ImportRecord, LineSpan};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// How far above a marker the correlator looks for the statement start.
pub const SCAN_WINDOW: usize = 20;

static QUOTED_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"['"`‘“]([^'"`’”]+)['"`’”]"#).expect("quoted name regex should be valid")
});

/// Find the import statement whose span contains `line` (1-indexed).
///
/// Starts at the marker line and walks upward at most `SCAN_WINDOW` lines,
/// stopping at blank lines and the adapter's scan barriers.
pub fn locate(grammar: &dyn ImportGrammar, lines: &[&str], line: usize) -> Option<ImportRecord> {
    if line == 0 || line > lines.len() {
        return None;
    }
    let idx = line - 1;
    let start = if grammar.recognizes_statement(lines[idx]) {
        idx
    } else {
        let mut found = None;
        for candidate in (idx.saturating_sub(SCAN_WINDOW)..idx).rev() {
            let text = lines[candidate];
            if grammar.recognizes_statement(text) {
                found = Some(candidate);
                break;
            }
            if text.trim().is_empty() || grammar.is_scan_barrier(text) {
                break;
            }
        }
        found?
    };
    let record = parse_at(grammar, lines, start)?;
    record.span().contains(line).then_some(record)
}

/// Whether a name quoted in a diagnostic refers to `symbol`. Engines quote
/// either the binding or a path ending (or, for Python packages, starting)
/// with it.
fn names_symbol(token: &str, symbol: &str) -> bool {
    token == symbol
        || ["/", ".", "::"]
            .iter()
            .any(|sep| token.ends_with(&format!("{sep}{symbol}")))
        || token.starts_with(&format!("{symbol}."))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn contains_word(line: &str, word: &str) -> bool {
    line.match_indices(word).any(|(at, _)| {
        let before = line[..at].chars().next_back();
        let after = line[at + word.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

/// Symbols of `record` the marker reports as unused. Empty means the whole
/// statement.
pub fn unused_symbols(record: &ImportRecord, marker: &Marker, lines: &[&str]) -> Vec<String> {
    if marker.message.to_lowercase().contains("all imports") {
        return Vec::new();
    }
    let tokens: Vec<&str> = QUOTED_NAME_RE
        .captures_iter(&marker.message)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .collect();
    let quoted: Vec<String> = record
        .symbols()
        .iter()
        .filter(|s| tokens.iter().any(|t| names_symbol(t, s)))
        .cloned()
        .collect();
    if !quoted.is_empty() {
        return quoted;
    }
    // Engines that flag one line of a multi-line statement without naming
    // the binding: take the bindings written on that line.
    if record.span().line_count() > 1 {
        if let Some(text) = marker.line.checked_sub(1).and_then(|i| lines.get(i)) {
            return record
                .symbols()
                .iter()
                .filter(|s| contains_word(text, s))
                .cloned()
                .collect();
        }
    }
    Vec::new()
}

/// Turns upstream markers into `UnusedImportRecord`s.
pub struct Correlator<'a> {
    registry: &'a AdapterRegistry,
    weights: ConfidenceWeights,
}

impl<'a> Correlator<'a> {
    pub fn new(registry: &'a AdapterRegistry, weights: ConfidenceWeights) -> Self {
        Self { registry, weights }
    }

    /// Correlate one marker against the text of its file, resolving the
    /// adapter from the marker's path.
    pub fn correlate(&self, marker: &Marker, text: &str) -> Option<UnusedImportRecord> {
        let grammar = self.registry.for_path(&marker.file);
        let lines: Vec<&str> = text.lines().collect();
        self.correlate_with(grammar.as_ref(), marker, &lines)
    }

    pub fn correlate_with(
        &self,
        grammar: &dyn ImportGrammar,
        marker: &Marker,
        lines: &[&str],
    ) -> Option<UnusedImportRecord> {
        if !marker.unnecessary {
            return None;
        }
        let Some(record) = locate(grammar, lines, marker.line) else {
            tracing::debug!(
                file = %marker.file.display(),
                line = marker.line,
                "marker does not point into an import statement"
            );
            return None;
        };
        let unused = unused_symbols(&record, marker, lines);
        Some(self.build(grammar, record, marker.clone(), unused))
    }

    fn build(
        &self,
        grammar: &dyn ImportGrammar,
        record: ImportRecord,
        marker: Marker,
        unused: Vec<String>,
    ) -> UnusedImportRecord {
        let has_side_effects = grammar.has_side_effects(&record);
        let signals = Signals::collect(grammar, &marker, &record, has_side_effects);
        let confidence = confidence::score(&self.weights, signals);
        let explanation = grammar.explain(&marker, &record, &unused);
        UnusedImportRecord::new(
            record,
            marker,
            unused,
            has_side_effects,
            confidence,
            explanation,
        )
    }

    /// Correlate every marker of one file and merge findings on the same
    /// statement, so each span appears once. Output is ordered by line.
    pub fn correlate_file(&self, markers: &[Marker], text: &str) -> Vec<UnusedImportRecord> {
        let lines: Vec<&str> = text.lines().collect();
        let mut by_span: BTreeMap<LineSpan, Vec<UnusedImportRecord>> = BTreeMap::new();
        for marker in markers {
            let grammar = self.registry.for_path(&marker.file);
            if let Some(found) = self.correlate_with(grammar.as_ref(), marker, &lines) {
                by_span
                    .entry(found.import_record().span())
                    .or_default()
                    .push(found);
            }
        }
        by_span
            .into_values()
            .filter_map(|group| self.merge(group))
            .collect()
    }

    fn merge(&self, mut group: Vec<UnusedImportRecord>) -> Option<UnusedImportRecord> {
        if group.len() <= 1 {
            return group.pop();
        }
        let whole = group.iter().any(|r| r.unused_symbols().is_empty());
        let mut unused: Vec<String> = Vec::new();
        if !whole {
            for found in &group {
                for symbol in found.unused_symbols() {
                    if !unused.contains(symbol) {
                        unused.push(symbol.clone());
                    }
                }
            }
        }
        // Keep the marker from the most trusted engine.
        let best = group
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.confidence().total_cmp(&b.confidence()))
            .map(|(i, _)| i)?;
        let chosen = group.swap_remove(best);
        let grammar = self.registry.for_path(chosen.file());
        let record = chosen.import_record().clone();
        let marker = chosen.source_marker().clone();
        Some(self.build(grammar.as_ref(), record, marker, unused))
    }
}
