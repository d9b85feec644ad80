use crate::parse::common::strip_line_comment;
use std::collections::HashSet;

fn is_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Identifier tokens on every line not in `skip_lines` (1-indexed), outside
/// comments and quoted string literals. Template literals are scanned, since
/// their `${}` holes are code.
pub fn identifiers(text: &str, skip_lines: &HashSet<usize>, comment: &str) -> HashSet<String> {
    let block_comments = comment == "//";
    let mut out = HashSet::new();
    let mut in_block = false;
    for (idx, line) in text.lines().enumerate() {
        if skip_lines.contains(&(idx + 1)) {
            continue;
        }
        let code = if in_block { line } else { strip_line_comment(line, comment) };
        let mut chars = code.char_indices().peekable();
        let mut quote: Option<char> = None;
        while let Some((at, c)) = chars.next() {
            if in_block {
                if c == '*' && code[at..].starts_with("*/") {
                    chars.next();
                    in_block = false;
                }
                continue;
            }
            if let Some(q) = quote {
                if c == '\\' {
                    chars.next();
                } else if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '"' | '\'' => quote = Some(c),
                '/' if block_comments && code[at..].starts_with("/*") => {
                    chars.next();
                    in_block = true;
                }
                '/' if block_comments && code[at..].starts_with("//") => break,
                c if is_start(c) => {
                    let mut end = at + c.len_utf8();
                    while let Some(&(next_at, next)) = chars.peek() {
                        if !is_continue(next) {
                            break;
                        }
                        end = next_at + next.len_utf8();
                        chars.next();
                    }
                    out.insert(code[at..end].to_string());
                }
                _ => {}
            }
        }
    }
    out
}
