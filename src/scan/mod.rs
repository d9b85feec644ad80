//! Textual usage heuristic: finds imports whose bindings never appear in the
//! rest of the file and reports them as `Marker`s, standing in for an
//! external diagnostic engine.

pub mod tokens;
pub mod tree;

use crate::diagnostic::Marker;
use crate::parse::{collect_imports, ImportGrammar, ImportKind, ImportRecord};
use std::collections::HashSet;
use std::path::Path;

/// Origin tag on markers produced here.
pub const SCANNER_ORIGIN: &str = "importsweep";

pub const ALL_UNUSED_MESSAGE: &str = "All imports in import declaration are unused.";

/// Markers for the unused bindings of `text`. Empty for languages the
/// heuristic cannot judge.
pub fn scan(grammar: &dyn ImportGrammar, file: &Path, text: &str) -> Vec<Marker> {
    if !grammar.usage_scan() {
        return Vec::new();
    }
    let records = collect_imports(grammar, text);
    if records.is_empty() {
        return Vec::new();
    }
    let import_lines: HashSet<usize> = records
        .iter()
        .flat_map(|r| r.span().start..=r.span().end)
        .collect();
    let used = grammar
        .tree_sitter_language()
        .and_then(|lang| tree::identifiers(&lang, text, grammar.import_node_kinds()))
        .unwrap_or_else(|| tokens::identifiers(text, &import_lines, grammar.line_comment()));

    let lines: Vec<&str> = text.lines().collect();
    let mut markers = Vec::new();
    for record in &records {
        if !is_judgeable(grammar, record) {
            continue;
        }
        let unused: Vec<&String> = record
            .symbols()
            .iter()
            .filter(|s| !used.contains(s.as_str()))
            .collect();
        if unused.is_empty() {
            continue;
        }
        tracing::debug!(
            file = %file.display(),
            line = record.span().start,
            unused = unused.len(),
            "unused bindings"
        );
        if unused.len() == record.symbols().len() {
            markers.push(
                Marker::unused(file, record.span().start, ALL_UNUSED_MESSAGE)
                    .with_origin(SCANNER_ORIGIN),
            );
            continue;
        }
        for symbol in unused {
            let line = binding_line(record, symbol, &lines);
            markers.push(
                Marker::unused(file, line, format!("'{symbol}' is imported but never used"))
                    .with_origin(SCANNER_ORIGIN),
            );
        }
    }
    markers
}

/// Side-effect, wildcard and re-exported imports are never reported, nor is
/// anything the adapter flags as possibly having side effects.
fn is_judgeable(grammar: &dyn ImportGrammar, record: &ImportRecord) -> bool {
    record.kind() != ImportKind::SideEffect
        && !record.is_wildcard()
        && !record.has_unknown_source()
        && !grammar.is_reexport(record)
        && !grammar.has_side_effects(record)
}

/// First line of the statement that mentions `symbol`.
fn binding_line(record: &ImportRecord, symbol: &str, lines: &[&str]) -> usize {
    let span = record.span();
    (span.start..=span.end)
        .find(|&line| {
            lines.get(line - 1).is_some_and(|text| {
                text.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
                    .any(|word| word == symbol)
            })
        })
        .unwrap_or(span.start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::csharp::CSharpGrammar;
    use crate::parse::go::GoGrammar;
    use crate::parse::python::PythonGrammar;
    use crate::parse::rust::RustGrammar;
    use crate::parse::typescript::TypeScriptGrammar;
    use pretty_assertions::assert_eq;

    fn messages(markers: &[Marker]) -> Vec<(usize, String)> {
        markers.iter().map(|m| (m.line, m.message.clone())).collect()
    }

    #[test]
    fn typescript_partial_and_whole() {
        let text = "import lodash from 'lodash';\nimport { a, b } from './x';\nimport './styles.css';\n\nexport const f = () => a();\n";
        let markers = scan(&TypeScriptGrammar, Path::new("f.ts"), text);
        assert_eq!(
            messages(&markers),
            vec![
                (1, ALL_UNUSED_MESSAGE.to_string()),
                (2, "'b' is imported but never used".to_string()),
            ]
        );
        assert!(markers.iter().all(|m| m.origin.as_deref() == Some(SCANNER_ORIGIN)));
    }

    #[test]
    fn python_multi_line_marker_lands_on_binding() {
        let text = "from typing import (\n    List,\n    Dict,\n)\n\nx: List[int] = []\n";
        let markers = scan(&PythonGrammar, Path::new("m.py"), text);
        assert_eq!(
            messages(&markers),
            vec![(3, "'Dict' is imported but never used".to_string())]
        );
    }

    #[test]
    fn go_blank_import_does_not_hide_block() {
        let text = "package main\n\nimport (\n\t\"os\"\n\t_ \"embed\"\n)\n\nfunc main() {}\n";
        let markers = scan(&GoGrammar, Path::new("main.go"), text);
        assert_eq!(messages(&markers), vec![(3, ALL_UNUSED_MESSAGE.to_string())]);

        let dotted = "package main\n\nimport (\n\t\"os\"\n\t. \"math\"\n)\n\nfunc main() {}\n";
        assert!(scan(&GoGrammar, Path::new("main.go"), dotted).is_empty());
    }

    #[test]
    fn rust_reexports_and_traits_are_skipped() {
        let text = "pub use crate::a::Thing;\nuse std::io::Write;\nuse std::path::Path;\n\nfn main() {}\n";
        let markers = scan(&RustGrammar, Path::new("lib.rs"), text);
        assert_eq!(messages(&markers), vec![(3, ALL_UNUSED_MESSAGE.to_string())]);
    }

    #[test]
    fn csharp_is_not_scanned() {
        let text = "using System.Linq;\nclass A {}\n";
        assert!(scan(&CSharpGrammar, Path::new("A.cs"), text).is_empty());
    }
}
