use crate::parse::common::{squash_whitespace, strip_line_comment, ImportKind, ImportRecord, LineSpan};
use crate::parse::explain::{ReasonTable, UnusedReason};
use crate::parse::ImportGrammar;
use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};

static USE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(pub(?:\s*\([^)]*\))?\s+)?use\s+(.+?)\s*;?$").expect("use regex should be valid")
});

static STATEMENT_START_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*((pub(\s*\([^)]*\))?\s+)?use\s|extern\s+crate\s)")
        .expect("statement start regex should be valid")
});

static EXTERN_CRATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^extern\s+crate\s+([A-Za-z_]\w*)(?:\s+as\s+([A-Za-z_]\w*))?\s*;?$")
        .expect("extern crate regex should be valid")
});

/// Traits imported only for their methods; the heuristic scanner cannot see
/// method-call uses.
static METHOD_TRAITS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"Ext$",
        r"^(Write|Read|BufRead|Seek|FromStr|Borrow|Hash|Hasher|Iterator|Context)$",
        r"^(Rng|SliceRandom|Itertools|Digest|Parser|Subcommand)$",
    ])
    .expect("trait patterns should be valid")
});

const REASONS: ReasonTable = &[
    ("unused import", UnusedReason::NeverReferenced),
    ("imported redundantly", UnusedReason::DuplicateImport),
];

pub struct RustGrammar;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    Ident(String),
    Sep,
    Open,
    Close,
    Comma,
    Star,
}

fn tokenize(text: &str) -> Option<Vec<Tok>> {
    let mut toks = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            ':' => {
                if chars.next() != Some(':') {
                    return None;
                }
                toks.push(Tok::Sep);
            }
            '{' => toks.push(Tok::Open),
            '}' => toks.push(Tok::Close),
            ',' => toks.push(Tok::Comma),
            '*' => toks.push(Tok::Star),
            c if c.is_alphanumeric() || c == '_' => {
                let mut ident = c.to_string();
                while let Some(&n) = chars.peek() {
                    if n.is_alphanumeric() || n == '_' || n == '#' {
                        ident.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                toks.push(Tok::Ident(ident));
            }
            _ => return None,
        }
    }
    Some(toks)
}

/// One node of a `use` tree: `path::{...}`, `path::*` or `path as alias`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct UseTree {
    path: Vec<String>,
    node: UseNode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum UseNode {
    Leaf(Option<String>),
    Glob,
    Group(Vec<UseTree>),
}

struct TreeParser {
    toks: Vec<Tok>,
    pos: usize,
}

impl TreeParser {
    fn peek(&self) -> Option<&Tok> {
        self.toks.get(self.pos)
    }

    fn next(&mut self) -> Option<Tok> {
        let tok = self.toks.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn tree(&mut self) -> Option<UseTree> {
        let mut path = Vec::new();
        if self.peek() == Some(&Tok::Sep) {
            self.pos += 1;
            path.push(String::new());
        }
        loop {
            match self.next()? {
                Tok::Ident(id) => {
                    path.push(id);
                    if self.peek() == Some(&Tok::Sep) {
                        self.pos += 1;
                        continue;
                    }
                    let alias = if self.peek() == Some(&Tok::Ident("as".into())) {
                        self.pos += 1;
                        match self.next()? {
                            Tok::Ident(alias) => Some(alias),
                            _ => return None,
                        }
                    } else {
                        None
                    };
                    return Some(UseTree {
                        path,
                        node: UseNode::Leaf(alias),
                    });
                }
                Tok::Star => {
                    return Some(UseTree {
                        path,
                        node: UseNode::Glob,
                    })
                }
                Tok::Open => {
                    let mut children = Vec::new();
                    loop {
                        if self.peek() == Some(&Tok::Close) {
                            self.pos += 1;
                            break;
                        }
                        children.push(self.tree()?);
                        match self.next()? {
                            Tok::Comma => continue,
                            Tok::Close => break,
                            _ => return None,
                        }
                    }
                    return Some(UseTree {
                        path,
                        node: UseNode::Group(children),
                    });
                }
                _ => return None,
            }
        }
    }
}

fn parse_tree(text: &str) -> Option<UseTree> {
    let mut parser = TreeParser {
        toks: tokenize(text)?,
        pos: 0,
    };
    let tree = parser.tree()?;
    (parser.pos == parser.toks.len()).then_some(tree)
}

impl UseTree {
    /// Local names introduced, in source order. `_` aliases are included.
    fn bindings(&self, parent: &[String], out: &mut Vec<String>) {
        let full: Vec<String> = parent.iter().chain(self.path.iter()).cloned().collect();
        match &self.node {
            UseNode::Leaf(Some(alias)) => out.push(alias.clone()),
            UseNode::Leaf(None) => {
                let name = match full.last().map(String::as_str) {
                    Some("self") if full.len() >= 2 => full[full.len() - 2].clone(),
                    Some(last) => last.to_string(),
                    None => return,
                };
                out.push(name);
            }
            UseNode::Glob => {}
            UseNode::Group(children) => {
                for child in children {
                    child.bindings(&full, out);
                }
            }
        }
    }

    fn has_glob(&self) -> bool {
        match &self.node {
            UseNode::Glob => true,
            UseNode::Group(children) => children.iter().any(UseTree::has_glob),
            UseNode::Leaf(_) => false,
        }
    }

    /// Module path the tree imports from.
    fn source(&self) -> String {
        match self.node {
            UseNode::Leaf(_) if self.path.len() > 1 => self.path[..self.path.len() - 1].join("::"),
            _ => self.path.join("::"),
        }
    }

    /// Copy of the tree without bindings in `unused`; `None` when nothing
    /// remains.
    fn prune(&self, parent: &[String], unused: &[String]) -> Option<UseTree> {
        let full: Vec<String> = parent.iter().chain(self.path.iter()).cloned().collect();
        match &self.node {
            UseNode::Leaf(_) => {
                let mut names = Vec::new();
                self.bindings(parent, &mut names);
                if names.iter().any(|n| unused.contains(n)) {
                    None
                } else {
                    Some(self.clone())
                }
            }
            UseNode::Glob => Some(self.clone()),
            UseNode::Group(children) => {
                let kept: Vec<UseTree> = children
                    .iter()
                    .filter_map(|c| c.prune(&full, unused))
                    .collect();
                match kept.len() {
                    0 => None,
                    1 if kept.len() < children.len() => {
                        let child = kept.into_iter().next()?;
                        if child.path == ["self"] && !self.path.is_empty() {
                            return Some(UseTree {
                                path: self.path.clone(),
                                node: child.node,
                            });
                        }
                        let mut path = self.path.clone();
                        path.extend(child.path);
                        Some(UseTree {
                            path,
                            node: child.node,
                        })
                    }
                    _ => Some(UseTree {
                        path: self.path.clone(),
                        node: UseNode::Group(kept),
                    }),
                }
            }
        }
    }

    fn prefix(&self) -> String {
        if self.path.is_empty() {
            String::new()
        } else {
            format!("{}::", self.path.join("::"))
        }
    }

    fn render(&self) -> String {
        match &self.node {
            UseNode::Leaf(alias) => {
                let path = self.path.join("::");
                match alias {
                    Some(alias) => format!("{path} as {alias}"),
                    None => path,
                }
            }
            UseNode::Glob => format!("{}*", self.prefix()),
            UseNode::Group(children) => {
                let inner: Vec<String> = children.iter().map(UseTree::render).collect();
                format!("{}{{{}}}", self.prefix(), inner.join(", "))
            }
        }
    }
}

fn normalize(text: &str) -> String {
    let code: Vec<&str> = text.lines().map(|l| strip_line_comment(l, "//")).collect();
    squash_whitespace(&code.join(" "))
}

struct UseStatement {
    visibility: Option<String>,
    tree: UseTree,
}

fn parse_use(text: &str) -> Option<UseStatement> {
    let normalized = normalize(text);
    let caps = USE_RE.captures(&normalized)?;
    Some(UseStatement {
        visibility: caps.get(1).map(|m| m.as_str().to_string()),
        tree: parse_tree(&caps[2])?,
    })
}

impl ImportGrammar for RustGrammar {
    fn id(&self) -> &'static str {
        "rust"
    }

    fn language_ids(&self) -> &'static [&'static str] {
        &["rust", "rs"]
    }

    fn recognizes_statement(&self, line: &str) -> bool {
        STATEMENT_START_RE.is_match(line)
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
        let normalized = normalize(text);
        if let Some(caps) = EXTERN_CRATE_RE.captures(&normalized) {
            let binding = caps.get(2).map_or(&caps[1], |m| m.as_str());
            let symbols = match binding {
                "_" => Vec::new(),
                name => vec![name.to_string()],
            };
            return Some(ImportRecord::new(
                ImportKind::Namespace,
                symbols,
                &caps[1],
                text,
                span,
            ));
        }
        if !normalized.ends_with(';') {
            return Some(ImportRecord::unparsed(text, span));
        }
        let Some(statement) = parse_use(text) else {
            return Some(ImportRecord::unparsed(text, span));
        };
        let mut names = Vec::new();
        statement.tree.bindings(&[], &mut names);
        let symbols: Vec<String> = names.into_iter().filter(|n| n != "_").collect();
        let kind = match statement.tree.node {
            UseNode::Leaf(_) if statement.tree.path.len() == 1 => ImportKind::Namespace,
            _ => ImportKind::Named,
        };
        Some(
            ImportRecord::new(kind, symbols, statement.tree.source(), text, span)
                .with_wildcard(statement.tree.has_glob()),
        )
    }

    /// Open until a `;` closes the statement at brace depth zero.
    fn continues(&self, text: &str) -> bool {
        let code = normalize(text);
        crate::parse::common::bracket_depth(text, "//") > 0 || !code.ends_with(';')
    }

    fn side_effect_hint(&self, record: &ImportRecord) -> bool {
        let raw = normalize(record.raw_text());
        raw.starts_with("extern crate")
            || raw.contains(" as _")
            || record.source().split("::").any(|s| s == "prelude")
            || record.symbols().iter().any(|s| METHOD_TRAITS.is_match(s))
    }

    fn reason_table(&self) -> ReasonTable {
        REASONS
    }

    fn reconstruct_without(&self, record: &ImportRecord, unused: &[String]) -> Option<String> {
        if record.symbols().iter().all(|s| unused.contains(s)) {
            return None;
        }
        let statement = parse_use(record.raw_text())?;
        let pruned = statement.tree.prune(&[], unused)?;
        let indent = record.indent();
        let visibility = statement.visibility.unwrap_or_default();
        let raw = record.raw_text();
        if let (true, UseNode::Group(children)) = (raw.contains('\n'), &pruned.node) {
            let item_indent = raw
                .lines()
                .nth(1)
                .map(|l| &l[..l.len() - l.trim_start().len()])
                .filter(|i| !i.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{indent}    "));
            let mut out = format!("{indent}{visibility}use {}{{\n", pruned.prefix());
            for child in children {
                out.push_str(&format!("{item_indent}{},\n", child.render()));
            }
            out.push_str(&format!("{indent}}};"));
            return Some(out);
        }
        Some(format!("{indent}{visibility}use {};", pruned.render()))
    }

    fn known_origins(&self) -> &'static [&'static str] {
        &["rustc", "rust-analyzer", "clippy", "cargo"]
    }

    fn unused_codes(&self) -> &'static [&'static str] {
        &["unused_imports"]
    }

    fn is_scan_barrier(&self, line: &str) -> bool {
        let t = line.trim_start();
        let item = ["fn ", "pub fn ", "impl", "struct ", "enum ", "trait ", "mod "]
            .iter()
            .any(|kw| t.starts_with(kw));
        item || (!self.recognizes_statement(line) && line.trim_end().ends_with(';'))
    }

    fn is_reexport(&self, record: &ImportRecord) -> bool {
        record.raw_text().trim_start().starts_with("pub")
    }

    fn tree_sitter_language(&self) -> Option<tree_sitter::Language> {
        Some(tree_sitter_rust::LANGUAGE.into())
    }

    fn import_node_kinds(&self) -> &'static [&'static str] {
        &["use_declaration", "extern_crate_declaration"]
    }
}
