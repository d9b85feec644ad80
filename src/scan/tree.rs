use std::collections::HashSet;
use tree_sitter::{Language, Node, Parser};

/// Identifier leaves of `text` outside nodes whose kind is in `skip_kinds`.
/// `None` when the grammar cannot be loaded or the parse is abandoned.
pub fn identifiers(language: &Language, text: &str, skip_kinds: &[&str]) -> Option<HashSet<String>> {
    let mut parser = Parser::new();
    if let Err(e) = parser.set_language(language) {
        tracing::warn!("tree-sitter grammar unavailable: {e}");
        return None;
    }
    let tree = parser.parse(text, None)?;
    let source = text.as_bytes();
    let mut out = HashSet::new();
    let mut stack: Vec<Node> = vec![tree.root_node()];
    while let Some(node) = stack.pop() {
        if skip_kinds.contains(&node.kind()) {
            continue;
        }
        if node.child_count() == 0 && node.kind().ends_with("identifier") {
            if let Ok(name) = node.utf8_text(source) {
                out.insert(name.to_string());
            }
            continue;
        }
        let mut cursor = node.walk();
        stack.extend(node.children(&mut cursor));
    }
    Some(out)
}
