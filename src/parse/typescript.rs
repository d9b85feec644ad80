use crate::parse::common::{
    is_identifier, squash_whitespace, strip_c_comments, ImportKind, ImportRecord, LineSpan,
};
use crate::parse::explain::{ReasonTable, UnusedReason};
use crate::parse::ImportGrammar;
use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};

/// `import "./polyfill";`
static BARE_IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^import\s*(['"])([^'"]+)['"]\s*;?$"#).expect("bare import regex should be valid")
});

/// `import type? <clause> from "module" (with { ... })?;`
static FROM_IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^import\s+(type\s+)?(.+?)\s*from\s*(['"])([^'"]+)['"]\s*((?:with|assert)\s*\{[^}]*\})?\s*;?$"#,
    )
    .expect("from import regex should be valid")
});

/// `import fs = require("fs");`
static IMPORT_EQUALS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^import\s+(?:type\s+)?([A-Za-z_$][\w$]*)\s*=\s*require\(\s*['"]([^'"]+)['"]\s*\)\s*;?$"#)
        .expect("import-equals regex should be valid")
});

static SIDE_EFFECT_SOURCES: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"\.(css|scss|sass|less|styl|stylus|pcss|postcss)(\?.*)?$",
        r"(^|[/@-])polyfills?([/.-]|$)",
        r"^reflect-metadata$",
        r"^zone\.js",
        r"^core-js(/|$)",
        r"^regenerator-runtime",
        r"jest-dom",
        r"^jest-extended",
        r"/register$",
        r"^dotenv/config$",
        r"^@angular/localize/init$",
    ])
    .expect("side-effect source patterns should be valid")
});

/// JSX factories are referenced by compiled markup, not by name.
static SIDE_EFFECT_SYMBOLS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([r"^React$", r"^h$", r"^jsx$"]).expect("JSX factory patterns should be valid")
});

const REASONS: ReasonTable = &[
    (
        "all imports in import declaration are unused",
        UnusedReason::NeverReferenced,
    ),
    ("only refers to a type", UnusedReason::TypeOnlyUnused),
    ("is declared but its value is never read", UnusedReason::NeverReferenced),
];

/// TypeScript and JavaScript (ES modules plus `import x = require()`).
pub struct TypeScriptGrammar;

#[derive(Debug, Clone, PartialEq, Eq)]
struct NamedItem {
    text: String,
    local: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Clause {
    default: Option<String>,
    namespace: Option<String>,
    named: Option<Vec<NamedItem>>,
    trailing_comma: bool,
}

impl Clause {
    fn parse(clause: &str) -> Option<Self> {
        let clause = clause.trim();
        let mut parsed = Clause::default();
        let head = match clause.find('{') {
            Some(open) => {
                let close = clause.rfind('}')?;
                if close < open || !clause[close + 1..].trim().is_empty() {
                    return None;
                }
                let inner = &clause[open + 1..close];
                parsed.trailing_comma = inner.trim_end().ends_with(',');
                let mut items = Vec::new();
                for item in inner.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    let local = match item.rsplit_once(" as ") {
                        Some((_, alias)) => alias.trim(),
                        None => item.strip_prefix("type ").unwrap_or(item).trim(),
                    };
                    if !is_identifier(local) {
                        return None;
                    }
                    items.push(NamedItem {
                        text: item.to_string(),
                        local: local.to_string(),
                    });
                }
                parsed.named = Some(items);
                clause[..open].trim().trim_end_matches(',').trim()
            }
            None => clause,
        };
        for part in head.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if let Some(rest) = part.strip_prefix('*') {
                let alias = rest.trim().strip_prefix("as")?.trim();
                if !is_identifier(alias) {
                    return None;
                }
                parsed.namespace = Some(alias.to_string());
            } else if is_identifier(part) && parsed.default.is_none() {
                parsed.default = Some(part.to_string());
            } else {
                return None;
            }
        }
        Some(parsed)
    }

    fn symbols(&self) -> Vec<String> {
        let mut symbols = Vec::new();
        symbols.extend(self.default.iter().cloned());
        symbols.extend(self.namespace.iter().cloned());
        if let Some(named) = &self.named {
            symbols.extend(named.iter().map(|n| n.local.clone()));
        }
        symbols
    }

    fn kind(&self) -> ImportKind {
        match (&self.named, &self.namespace, &self.default) {
            (Some(named), _, _) if !named.is_empty() => ImportKind::Named,
            (_, Some(_), _) => ImportKind::Namespace,
            (_, _, Some(_)) => ImportKind::Default,
            _ => ImportKind::SideEffect,
        }
    }
}

struct FromImport {
    type_only: bool,
    clause: Clause,
    quote: String,
    source: String,
    attributes: Option<String>,
    semicolon: bool,
}

fn parse_from_import(text: &str) -> Option<FromImport> {
    let squashed = squash_whitespace(&strip_c_comments(text));
    let caps = FROM_IMPORT_RE.captures(&squashed)?;
    Some(FromImport {
        type_only: caps.get(1).is_some(),
        clause: Clause::parse(caps.get(2)?.as_str())?,
        quote: caps.get(3)?.as_str().to_string(),
        source: caps.get(4)?.as_str().to_string(),
        attributes: caps.get(5).map(|m| m.as_str().to_string()),
        semicolon: squashed.ends_with(';'),
    })
}

impl ImportGrammar for TypeScriptGrammar {
    fn id(&self) -> &'static str {
        "typescript"
    }

    fn language_ids(&self) -> &'static [&'static str] {
        &[
            "typescript",
            "typescriptreact",
            "javascript",
            "javascriptreact",
            "ts",
            "tsx",
            "js",
            "jsx",
        ]
    }

    fn recognizes_statement(&self, line: &str) -> bool {
        line.trim_start()
            .strip_prefix("import")
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_whitespace() || matches!(c, '{' | '*' | '"' | '\''))
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
        let squashed = squash_whitespace(&strip_c_comments(text));

        if let Some(caps) = BARE_IMPORT_RE.captures(&squashed) {
            return Some(ImportRecord::side_effect(&caps[2], text, span));
        }
        if let Some(caps) = IMPORT_EQUALS_RE.captures(&squashed) {
            return Some(ImportRecord::new(
                ImportKind::Namespace,
                vec![caps[1].to_string()],
                &caps[2],
                text,
                span,
            ));
        }
        match parse_from_import(text) {
            Some(import) => Some(ImportRecord::new(
                import.clause.kind(),
                import.clause.symbols(),
                import.source,
                text,
                span,
            )),
            None => Some(ImportRecord::unparsed(text, span)),
        }
    }

    fn side_effect_hint(&self, record: &ImportRecord) -> bool {
        SIDE_EFFECT_SOURCES.is_match(record.source())
            || record
                .symbols()
                .iter()
                .any(|s| SIDE_EFFECT_SYMBOLS.is_match(s))
    }

    fn reason_table(&self) -> ReasonTable {
        REASONS
    }

    fn reconstruct_without(&self, record: &ImportRecord, unused: &[String]) -> Option<String> {
        if record.symbols().is_empty() || record.symbols().iter().all(|s| unused.contains(s)) {
            return None;
        }
        let import = parse_from_import(record.raw_text())?;
        let clause = &import.clause;

        let mut parts = Vec::new();
        if let Some(default) = clause.default.as_ref().filter(|d| !unused.contains(d)) {
            parts.push(default.clone());
        }
        if let Some(ns) = clause.namespace.as_ref().filter(|n| !unused.contains(n)) {
            parts.push(format!("* as {ns}"));
        }
        let kept: Vec<&NamedItem> = clause
            .named
            .iter()
            .flatten()
            .filter(|item| !unused.contains(&item.local))
            .collect();
        if !kept.is_empty() {
            parts.push(render_named(record, &kept, clause.trailing_comma));
        }
        if parts.is_empty() {
            return None;
        }

        let mut out = format!(
            "{}import {}{} from {q}{}{q}",
            record.indent(),
            if import.type_only { "type " } else { "" },
            parts.join(", "),
            import.source,
            q = import.quote,
        );
        if let Some(attributes) = import.attributes {
            out.push(' ');
            out.push_str(&attributes);
        }
        if import.semicolon {
            out.push(';');
        }
        Some(out)
    }

    fn known_origins(&self) -> &'static [&'static str] {
        &["ts", "typescript", "eslint", "biome", "deno-ts", "deno-lint", "oxlint"]
    }

    fn unused_codes(&self) -> &'static [&'static str] {
        &[
            "6133",
            "6192",
            "6196",
            "6198",
            "no-unused-vars",
            "@typescript-eslint/no-unused-vars",
            "unused-imports/no-unused-imports",
            "lint/correctness/noUnusedImports",
        ]
    }
}

/// Render the kept named bindings, keeping a multi-line layout when the
/// original statement had one.
fn render_named(record: &ImportRecord, kept: &[&NamedItem], trailing_comma: bool) -> String {
    let raw = record.raw_text();
    if !raw.contains('\n') {
        let items: Vec<&str> = kept.iter().map(|k| k.text.as_str()).collect();
        return format!("{{ {} }}", items.join(", "));
    }
    let item_indent = raw
        .lines()
        .nth(1)
        .map(|l| &l[..l.len() - l.trim_start().len()])
        .filter(|i| !i.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}  ", record.indent()));
    let mut out = String::from("{\n");
    for (i, item) in kept.iter().enumerate() {
        out.push_str(&item_indent);
        out.push_str(&item.text);
        if i + 1 < kept.len() || trailing_comma {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str(record.indent());
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ImportRecord {
        let lines = text.lines().count();
        TypeScriptGrammar
            .parse(text, 1, Some(lines.max(1)))
            .expect("should parse")
    }

    #[test]
    fn recognizes_import_forms() {
        let g = TypeScriptGrammar;
        assert!(g.recognizes_statement("import React from 'react';"));
        assert!(g.recognizes_statement("  import {a} from './a'"));
        assert!(g.recognizes_statement("import './styles.css';"));
        assert!(g.recognizes_statement("import * as path from 'path';"));
        assert!(!g.recognizes_statement("const x = await import('./lazy');"));
        assert!(!g.recognizes_statement("import.meta.url"));
        assert!(!g.recognizes_statement("important();"));
    }

    #[test]
    fn parses_named_import() {
        let record = parse("import { a, b as bee, type C } from './x';");
        assert_eq!(record.kind(), ImportKind::Named);
        assert_eq!(record.symbols(), ["a", "bee", "C"]);
        assert_eq!(record.source(), "./x");
    }

    #[test]
    fn parses_default_and_namespace() {
        let record = parse("import React from \"react\"");
        assert_eq!(record.kind(), ImportKind::Default);
        assert_eq!(record.symbols(), ["React"]);

        let record = parse("import * as fs from 'fs';");
        assert_eq!(record.kind(), ImportKind::Namespace);
        assert_eq!(record.symbols(), ["fs"]);
    }

    #[test]
    fn parses_mixed_default_and_named() {
        let record = parse("import React, { useState, useEffect } from 'react';");
        assert_eq!(record.kind(), ImportKind::Named);
        assert_eq!(record.symbols(), ["React", "useState", "useEffect"]);
    }

    #[test]
    fn parses_side_effect_import() {
        let record = parse("import './styles.css';");
        assert_eq!(record.kind(), ImportKind::SideEffect);
        assert_eq!(record.source(), "./styles.css");
        assert!(TypeScriptGrammar.has_side_effects(&record));
    }

    #[test]
    fn parses_multiline_import() {
        let record = parse("import {\n  a,\n  b,\n} from './x';");
        assert_eq!(record.symbols(), ["a", "b"]);
        assert_eq!(record.span(), LineSpan::new(1, 4));
    }

    #[test]
    fn parses_multiline_import_with_comments() {
        let record = parse("import {\n  a, // first\n  /* legacy */ b,\n} from './x'; // tail");
        assert_eq!(record.kind(), ImportKind::Named);
        assert_eq!(record.symbols(), ["a", "b"]);
        assert_eq!(record.source(), "./x");
        assert_eq!(record.span(), LineSpan::new(1, 4));

        let rebuilt = TypeScriptGrammar
            .reconstruct_without(&record, &["a".to_string()])
            .unwrap();
        assert_eq!(rebuilt, "import {\n  b,\n} from './x';");
    }

    #[test]
    fn parses_import_equals() {
        let record = parse("import fs = require('fs');");
        assert_eq!(record.kind(), ImportKind::Namespace);
        assert_eq!(record.symbols(), ["fs"]);
    }

    #[test]
    fn garbled_import_is_conservative() {
        let record = parse("import { a from './x';");
        assert_eq!(record.kind(), ImportKind::SideEffect);
        assert!(record.has_unknown_source());
        assert!(TypeScriptGrammar.has_side_effects(&record));
    }

    #[test]
    fn side_effect_hints() {
        let g = TypeScriptGrammar;
        assert!(g.has_side_effects(&parse("import 'reflect-metadata';")));
        assert!(g.has_side_effects(&parse("import styles from './app.module.scss';")));
        assert!(g.has_side_effects(&parse("import React from 'react';")));
        assert!(!g.has_side_effects(&parse("import { map } from 'lodash';")));
    }

    #[test]
    fn reconstruct_keeps_order() {
        let record = parse("import { a, b, c } from './x';");
        let rebuilt = TypeScriptGrammar
            .reconstruct_without(&record, &["b".to_string()])
            .unwrap();
        assert_eq!(rebuilt, "import { a, c } from './x';");
    }

    #[test]
    fn reconstruct_keeps_default_binding() {
        let record = parse("import React, { useState, useMemo } from \"react\"");
        let rebuilt = TypeScriptGrammar
            .reconstruct_without(&record, &["useState".to_string(), "useMemo".to_string()])
            .unwrap();
        assert_eq!(rebuilt, "import React from \"react\"");
    }

    #[test]
    fn reconstruct_multiline_layout() {
        let record = parse("import {\n    a,\n    b,\n    c,\n} from './x';");
        let rebuilt = TypeScriptGrammar
            .reconstruct_without(&record, &["a".to_string()])
            .unwrap();
        assert_eq!(rebuilt, "import {\n    b,\n    c,\n} from './x';");
    }

    #[test]
    fn reconstruct_all_unused_is_none() {
        let record = parse("import { a, b } from './x';");
        assert!(TypeScriptGrammar
            .reconstruct_without(&record, &["a".to_string(), "b".to_string()])
            .is_none());
        let bare = parse("import './x.css';");
        assert!(TypeScriptGrammar.reconstruct_without(&bare, &[]).is_none());
    }
}
