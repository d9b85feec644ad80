use crate::parse::common::{strip_line_comment, ImportKind, ImportRecord, LineSpan};
use crate::parse::explain::{ReasonTable, UnusedReason};
use crate::parse::ImportGrammar;
use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};

static SPEC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?:([A-Za-z_]\w*|\.)\s+)?["`]([^"`]+)["`]$"#).expect("spec regex should be valid")
});

static VERSION_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[./]v\d+$").expect("version regex should be valid"));

static SIDE_EFFECT_SOURCES: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"^embed$",
        r"^net/http/pprof$",
        r"^expvar$",
        r"^time/tzdata$",
        r"^image/(png|jpeg|gif)$",
        r"^golang\.org/x/image/(webp|bmp|tiff)$",
        r"^github\.com/lib/pq$",
        r"^github\.com/go-sql-driver/mysql$",
        r"^github\.com/mattn/go-sqlite3$",
        r"^github\.com/jackc/pgx/(v\d+/)?stdlib$",
        r"^modernc\.org/sqlite$",
        r"^github\.com/joho/godotenv/autoload$",
    ])
    .expect("side-effect source patterns should be valid")
});

const REASONS: ReasonTable = &[("imported and not used", UnusedReason::NeverReferenced)];

pub struct GoGrammar;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ImportSpec {
    alias: Option<String>,
    path: String,
}

impl ImportSpec {
    fn parse(code: &str) -> Option<Self> {
        let caps = SPEC_RE.captures(code.trim())?;
        Some(Self {
            alias: caps.get(1).map(|m| m.as_str().to_string()),
            path: caps[2].to_string(),
        })
    }

    fn is_blank_or_dot(&self) -> bool {
        matches!(self.alias.as_deref(), Some("_") | Some("."))
    }

    /// Name the spec binds in the file scope.
    fn local_name(&self) -> String {
        match &self.alias {
            Some(alias) => alias.clone(),
            None => package_name(&self.path),
        }
    }
}

/// Conventional package name for an import path: the last segment without a
/// major-version suffix or `go-` decoration.
pub fn package_name(path: &str) -> String {
    let trimmed = VERSION_SUFFIX_RE.replace(path, "");
    let last = trimmed.rsplit('/').next().unwrap_or(&trimmed);
    let last = last.strip_prefix("go-").unwrap_or(last);
    let last = last.strip_suffix("-go").unwrap_or(last);
    last.replace('-', "")
}

fn is_block(text: &str) -> bool {
    strip_line_comment(text, "//")
        .trim_start()
        .strip_prefix("import")
        .is_some_and(|rest| rest.trim_start().starts_with('('))
}

/// Specs of an `import (...)` block, in order. `None` when any entry is not a
/// recognizable spec.
fn block_specs(text: &str) -> Option<Vec<ImportSpec>> {
    let code: Vec<&str> = text.lines().map(|l| strip_line_comment(l, "//")).collect();
    let code = code.join("\n");
    let open = code.find('(')?;
    let close = code.rfind(')')?;
    if close < open {
        return None;
    }
    code[open + 1..close]
        .split(['\n', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ImportSpec::parse)
        .collect()
}

impl ImportGrammar for GoGrammar {
    fn id(&self) -> &'static str {
        "go"
    }

    fn language_ids(&self) -> &'static [&'static str] {
        &["go"]
    }

    fn recognizes_statement(&self, line: &str) -> bool {
        let t = line.trim_start();
        t.starts_with("import ") || t.starts_with("import(")
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
        let specs = if is_block(text) {
            match block_specs(text) {
                Some(specs) if !specs.is_empty() => specs,
                _ => return Some(ImportRecord::unparsed(text, span)),
            }
        } else {
            let code = strip_line_comment(text, "//");
            let body = code.trim_start().trim_start_matches("import").trim();
            match ImportSpec::parse(body) {
                Some(spec) => vec![spec],
                None => return Some(ImportRecord::unparsed(text, span)),
            }
        };
        let source = specs
            .iter()
            .map(|s| s.path.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let wildcard = specs.iter().any(|s| s.alias.as_deref() == Some("."));
        let symbols: Vec<String> = specs
            .iter()
            .filter(|s| !s.is_blank_or_dot())
            .map(ImportSpec::local_name)
            .collect();
        let kind = if specs.len() == 1 && specs[0].alias.as_deref() == Some("_") {
            ImportKind::SideEffect
        } else {
            ImportKind::Namespace
        };
        Some(ImportRecord::new(kind, symbols, source, text, span).with_wildcard(wildcard))
    }

    /// Blank specs of a block are kept by `reconstruct_without`, so a block
    /// is judged by the packages it binds.
    fn side_effect_hint(&self, record: &ImportRecord) -> bool {
        if !is_block(record.raw_text()) {
            return record.source().split(", ").any(|s| SIDE_EFFECT_SOURCES.is_match(s));
        }
        match block_specs(record.raw_text()) {
            Some(specs) => specs
                .iter()
                .filter(|spec| !spec.is_blank_or_dot())
                .any(|spec| SIDE_EFFECT_SOURCES.is_match(&spec.path)),
            None => true,
        }
    }

    fn reason_table(&self) -> ReasonTable {
        REASONS
    }

    /// Drops the spec lines of unused packages from a block.
    fn reconstruct_without(&self, record: &ImportRecord, unused: &[String]) -> Option<String> {
        let raw = record.raw_text();
        if !is_block(raw) || record.symbols().is_empty() {
            return None;
        }
        let keeps_blank = block_specs(raw)?.iter().any(ImportSpec::is_blank_or_dot);
        if !keeps_blank && record.symbols().iter().all(|s| unused.contains(s)) {
            return None;
        }
        let indent = record.indent();
        let lines: Vec<&str> = raw.lines().collect();
        let canonical = lines.len() >= 2
            && lines[0].trim_end().ends_with('(')
            && lines.last().is_some_and(|l| l.trim() == ")");
        if !canonical {
            let specs = block_specs(raw)?;
            let mut out = format!("{indent}import (\n");
            for spec in specs {
                if !spec.is_blank_or_dot() && unused.contains(&spec.local_name()) {
                    continue;
                }
                let alias = spec.alias.map(|a| format!("{a} ")).unwrap_or_default();
                out.push_str(&format!("{indent}\t{alias}\"{}\"\n", spec.path));
            }
            out.push_str(indent);
            out.push(')');
            return Some(out);
        }
        let mut body: Vec<&str> = Vec::new();
        for line in &lines[1..lines.len() - 1] {
            let code = strip_line_comment(line, "//").trim();
            if let Some(spec) = ImportSpec::parse(code) {
                if !spec.is_blank_or_dot() && unused.contains(&spec.local_name()) {
                    continue;
                }
            }
            if line.trim().is_empty() && body.last().map_or(true, |l| l.trim().is_empty()) {
                continue;
            }
            body.push(*line);
        }
        while body.last().is_some_and(|l| l.trim().is_empty()) {
            body.pop();
        }
        let mut out = String::from(lines[0]);
        for line in body {
            out.push('\n');
            out.push_str(line);
        }
        out.push('\n');
        out.push_str(lines[lines.len() - 1]);
        Some(out)
    }

    fn known_origins(&self) -> &'static [&'static str] {
        &[
            "compiler",
            "go",
            "gopls",
            "staticcheck",
            "go vet",
            "golangci-lint",
        ]
    }

    fn unused_codes(&self) -> &'static [&'static str] {
        &["UnusedImport"]
    }

    /// Top-level declarations and block closers end the import section.
    fn is_scan_barrier(&self, line: &str) -> bool {
        ["func ", "type ", "var ", "const ", "package "]
            .iter()
            .any(|kw| line.starts_with(kw))
            || (line.trim_end() == ")" && !line.starts_with(char::is_whitespace))
    }

    fn tree_sitter_language(&self) -> Option<tree_sitter::Language> {
        Some(tree_sitter_go::LANGUAGE.into())
    }

    fn import_node_kinds(&self) -> &'static [&'static str] {
        &["import_declaration", "package_clause"]
    }
}
