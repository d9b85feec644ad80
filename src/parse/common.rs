use serde::{Deserialize, Serialize};

/// Placeholder source for statements whose module path could not be resolved.
pub const UNKNOWN_SOURCE: &str = "<unknown>";

/// Classification of an import statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportKind {
    /// `import { a, b } from "x"`, `from x import a`, `use a::{b, c}`
    Named,
    /// `import React from "react"`
    Default,
    /// `import * as ns from "x"`, `import os`, `using System.Linq;`
    Namespace,
    /// `import "./styles.css"`, `#include <stdio.h>`, `import _ "lib/pq"`
    SideEffect,
}

impl std::fmt::Display for ImportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportKind::Named => write!(f, "named"),
            ImportKind::Default => write!(f, "default"),
            ImportKind::Namespace => write!(f, "namespace"),
            ImportKind::SideEffect => write!(f, "side-effect"),
        }
    }
}

/// Inclusive, 1-indexed line range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
}

impl LineSpan {
    /// Build a span; `end` is raised to `start` when smaller.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn single(line: usize) -> Self {
        Self::new(line, line)
    }

    pub fn contains(&self, line: usize) -> bool {
        self.start <= line && line <= self.end
    }

    pub fn line_count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// One parsed import/include statement.
///
/// Fields are private so `kind == SideEffect` holds exactly when `symbols` is
/// empty for every record in existence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRecord {
    kind: ImportKind,
    symbols: Vec<String>,
    source: String,
    raw_text: String,
    span: LineSpan,
    wildcard: bool,
}

impl ImportRecord {
    /// Create a record. An empty symbol list forces `SideEffect`; a
    /// `SideEffect` kind discards any symbols passed in.
    pub fn new(
        kind: ImportKind,
        symbols: Vec<String>,
        source: impl Into<String>,
        raw_text: impl Into<String>,
        span: LineSpan,
    ) -> Self {
        let (kind, symbols) = if symbols.is_empty() || kind == ImportKind::SideEffect {
            (ImportKind::SideEffect, Vec::new())
        } else {
            (kind, symbols)
        };
        let source = source.into();
        Self {
            kind,
            symbols,
            source: if source.trim().is_empty() {
                UNKNOWN_SOURCE.to_string()
            } else {
                source
            },
            raw_text: raw_text.into(),
            span,
            wildcard: false,
        }
    }

    pub fn side_effect(
        source: impl Into<String>,
        raw_text: impl Into<String>,
        span: LineSpan,
    ) -> Self {
        Self::new(ImportKind::SideEffect, Vec::new(), source, raw_text, span)
    }

    /// Record for a statement whose keyword matched but whose body could not
    /// be understood.
    pub fn unparsed(raw_text: impl Into<String>, span: LineSpan) -> Self {
        Self::side_effect(UNKNOWN_SOURCE, raw_text, span)
    }

    pub fn with_wildcard(mut self, wildcard: bool) -> Self {
        self.wildcard = wildcard;
        self
    }

    pub fn kind(&self) -> ImportKind {
        self.kind
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn span(&self) -> LineSpan {
        self.span
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    pub fn has_unknown_source(&self) -> bool {
        self.source == UNKNOWN_SOURCE
    }

    /// Leading whitespace of the first line, reused when rebuilding statements.
    pub fn indent(&self) -> &str {
        let first = self.raw_text.lines().next().unwrap_or_default();
        &first[..first.len() - first.trim_start().len()]
    }
}

/// Collapse every run of whitespace (including newlines) into one space.
pub fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove a trailing line comment that is not inside a string literal.
pub fn strip_line_comment<'a>(line: &'a str, marker: &str) -> &'a str {
    if marker.is_empty() {
        return line;
    }
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match quote {
            Some(q) => {
                if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None => {
                if c == '"' || c == '\'' || c == '`' {
                    quote = Some(c);
                } else if line[idx..].starts_with(marker) {
                    return &line[..idx];
                }
            }
        }
    }
    line
}

/// Remove `//` and `/* ... */` comments that are not inside a string
/// literal, keeping line breaks. An unterminated block comment runs to the
/// end of `text`.
pub fn strip_c_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q || c == '\n' {
                quote = None;
            }
            continue;
        }
        match (c, chars.peek().copied()) {
            ('/', Some('/')) => {
                for inner in chars.by_ref() {
                    if inner == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = ' ';
                for inner in chars.by_ref() {
                    if inner == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && inner == '/' {
                        break;
                    }
                    prev = inner;
                }
                out.push(' ');
            }
            _ => {
                if matches!(c, '"' | '\'' | '`') {
                    quote = Some(c);
                }
                out.push(c);
            }
        }
    }
    out
}

/// Net bracket depth of `text`, ignoring brackets inside strings and after
/// line comments. Positive means the statement is still open.
pub fn bracket_depth(text: &str, comment: &str) -> i32 {
    let mut depth = 0i32;
    for line in text.lines() {
        let code = strip_line_comment(line, comment);
        let mut quote: Option<char> = None;
        let mut escaped = false;
        for c in code.chars() {
            if escaped {
                escaped = false;
                continue;
            }
            match quote {
                Some(q) => {
                    if c == '\\' {
                        escaped = true;
                    } else if c == q {
                        quote = None;
                    }
                }
                None => match c {
                    '"' | '\'' | '`' => quote = Some(c),
                    '(' | '[' | '{' => depth += 1,
                    ')' | ']' | '}' => depth -= 1,
                    _ => {}
                },
            }
        }
    }
    depth
}

/// ASCII-ish identifier test shared by the adapters (`$` allowed for JS).
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Last path segment of a module path split on any of `/`, `.`, `::`.
pub fn last_segment(path: &str) -> &str {
    path.rsplit(['/', '.', ':'])
        .find(|s| !s.is_empty())
        .unwrap_or(path)
}
