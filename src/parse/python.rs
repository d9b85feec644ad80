use crate::parse::common::{
    is_identifier, squash_whitespace, strip_line_comment, ImportKind, ImportRecord, LineSpan,
};
use crate::parse::explain::{ReasonTable, UnusedReason};
use crate::parse::ImportGrammar;
use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};

static FROM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^from\s+(\.*[A-Za-z_][\w.]*|\.+)\s+import\s+(.+)$")
        .expect("from-import regex should be valid")
});

static IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^import\s+(.+)$").expect("import regex should be valid"));

static SIDE_EFFECT_SOURCES: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"^__future__$",
        r"^gevent(\.monkey)?$",
        r"^eventlet$",
        r"^django\.setup$",
        r"^logging\.config$",
        r"^matplotlib\.(use|backends(\..+)?)$",
        r"^pytest_",
        r"^conftest$",
        r"^readline$",
        r"^rlcompleter$",
        r"^site$",
        r"^antigravity$",
        r"^this$",
        r"\.(signals|receivers|handlers)$",
    ])
    .expect("side-effect source patterns should be valid")
});

static SIDE_EFFECT_SYMBOLS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([r"^(patch_all|monkey_patch|autodiscover|register|setup)$"])
        .expect("side-effect symbol patterns should be valid")
});

const REASONS: ReasonTable = &[
    ("imported but unused", UnusedReason::NeverReferenced),
    ("is not accessed", UnusedReason::NeverReferenced),
];

pub struct PythonGrammar;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Binding {
    text: String,
    local: String,
}

#[derive(Debug)]
enum Statement {
    /// `import a.b as c, d`
    Import(Vec<(String, Binding)>),
    /// `from m import a, b as c`
    From {
        module: String,
        names: Vec<Binding>,
        wildcard: bool,
    },
}

/// Strip comments and line continuations, then collapse whitespace.
fn normalize(text: &str) -> String {
    let joined: Vec<&str> = text
        .lines()
        .map(|l| strip_line_comment(l, "#").trim_end().trim_end_matches('\\'))
        .collect();
    squash_whitespace(&joined.join(" "))
}

fn parse_binding(item: &str) -> Option<(String, Binding)> {
    let (target, alias) = match item.split_once(" as ") {
        Some((target, alias)) => (target.trim(), Some(alias.trim())),
        None => (item.trim(), None),
    };
    if target.is_empty() || !target.split('.').all(|seg| seg.is_empty() || is_identifier(seg)) {
        return None;
    }
    let local = match alias {
        Some(alias) if is_identifier(alias) => alias.to_string(),
        Some(_) => return None,
        None => target.split('.').find(|s| !s.is_empty())?.to_string(),
    };
    Some((
        target.to_string(),
        Binding {
            text: item.trim().to_string(),
            local,
        },
    ))
}

fn parse_statement(text: &str) -> Option<Statement> {
    let normalized = normalize(text);
    let normalized = normalized.trim_end_matches(';').trim();
    if normalized.contains(';') {
        return None;
    }
    if let Some(caps) = FROM_RE.captures(normalized) {
        let module = caps[1].to_string();
        let names = caps[2]
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')')
            .trim()
            .to_string();
        if names == "*" {
            return Some(Statement::From {
                module,
                names: Vec::new(),
                wildcard: true,
            });
        }
        let mut bindings = Vec::new();
        for item in names.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (target, binding) = parse_binding(item)?;
            if target.contains('.') {
                return None;
            }
            bindings.push(binding);
        }
        if bindings.is_empty() {
            return None;
        }
        return Some(Statement::From {
            module,
            names: bindings,
            wildcard: false,
        });
    }
    let caps = IMPORT_RE.captures(normalized)?;
    let mut modules = Vec::new();
    for item in caps[1].split(',').map(str::trim).filter(|s| !s.is_empty()) {
        modules.push(parse_binding(item)?);
    }
    if modules.is_empty() {
        return None;
    }
    Some(Statement::Import(modules))
}

impl ImportGrammar for PythonGrammar {
    fn id(&self) -> &'static str {
        "python"
    }

    fn language_ids(&self) -> &'static [&'static str] {
        &["python", "py", "pyi"]
    }

    fn recognizes_statement(&self, line: &str) -> bool {
        let t = line.trim_start();
        t.starts_with("import ") || t.starts_with("from ")
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
        let record = match parse_statement(text) {
            Some(Statement::Import(modules)) => {
                let source = modules
                    .iter()
                    .map(|(m, _)| m.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                let symbols = modules.into_iter().map(|(_, b)| b.local).collect();
                ImportRecord::new(ImportKind::Namespace, symbols, source, text, span)
            }
            Some(Statement::From {
                module,
                names,
                wildcard,
            }) => {
                let symbols = names.into_iter().map(|b| b.local).collect();
                ImportRecord::new(ImportKind::Named, symbols, module, text, span)
                    .with_wildcard(wildcard)
            }
            None => ImportRecord::unparsed(text, span),
        };
        Some(record)
    }

    fn line_comment(&self) -> &'static str {
        "#"
    }

    fn side_effect_hint(&self, record: &ImportRecord) -> bool {
        record
            .source()
            .split(", ")
            .any(|s| SIDE_EFFECT_SOURCES.is_match(s))
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
        let indent = record.indent();
        match parse_statement(record.raw_text())? {
            Statement::Import(modules) => {
                let kept: Vec<&str> = modules
                    .iter()
                    .filter(|(_, b)| !unused.contains(&b.local))
                    .map(|(_, b)| b.text.as_str())
                    .collect();
                Some(format!("{indent}import {}", kept.join(", ")))
            }
            Statement::From { module, names, .. } => {
                let kept: Vec<&str> = names
                    .iter()
                    .filter(|b| !unused.contains(&b.local))
                    .map(|b| b.text.as_str())
                    .collect();
                let raw = record.raw_text();
                if raw.contains('(') && raw.contains('\n') {
                    let item_indent = raw
                        .lines()
                        .nth(1)
                        .map(|l| &l[..l.len() - l.trim_start().len()])
                        .filter(|i| !i.is_empty())
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("{indent}    "));
                    let mut out = format!("{indent}from {module} import (\n");
                    for name in kept {
                        out.push_str(&format!("{item_indent}{name},\n"));
                    }
                    out.push_str(indent);
                    out.push(')');
                    Some(out)
                } else if raw.contains('(') {
                    Some(format!("{indent}from {module} import ({})", kept.join(", ")))
                } else {
                    Some(format!("{indent}from {module} import {}", kept.join(", ")))
                }
            }
        }
    }

    fn known_origins(&self) -> &'static [&'static str] {
        &[
            "pylance",
            "pyright",
            "basedpyright",
            "pylint",
            "flake8",
            "ruff",
            "pyflakes",
            "mypy",
        ]
    }

    fn unused_codes(&self) -> &'static [&'static str] {
        &["reportUnusedImport", "F401", "W0611", "unused-import"]
    }

    /// A top-level (unindented) statement that is not an import.
    fn is_scan_barrier(&self, line: &str) -> bool {
        let starts_at_column_zero = line.chars().next().is_some_and(|c| !c.is_whitespace());
        starts_at_column_zero && !self.recognizes_statement(line) && !line.starts_with(')')
    }

    fn tree_sitter_language(&self) -> Option<tree_sitter::Language> {
        Some(tree_sitter_python::LANGUAGE.into())
    }

    fn import_node_kinds(&self) -> &'static [&'static str] {
        &[
            "import_statement",
            "import_from_statement",
            "future_import_statement",
        ]
    }
}
