use crate::errors::{ImportSweepError, Result};
use crate::plan::Edit;
use std::path::Path;

/// Apply one file's edits to its text. Edits may come in any order; they are
/// validated up front so a batch applies entirely or not at all. The file's
/// line terminator style and trailing newline are preserved.
pub fn apply_edits(path: &Path, text: &str, edits: &[Edit]) -> Result<String> {
    let eol = if text.contains("\r\n") { "\r\n" } else { "\n" };
    let trailing_newline = text.ends_with('\n');
    let mut lines: Vec<&str> = text.lines().collect();

    let mut ordered: Vec<&Edit> = edits.iter().collect();
    ordered.sort_by(|a, b| b.start_line.cmp(&a.start_line));

    let mut floor = usize::MAX;
    for edit in &ordered {
        let stale = |reason: &str| ImportSweepError::StaleEdit {
            path: path.to_path_buf(),
            line: edit.start_line,
            reason: reason.to_string(),
        };
        if edit.start_line == 0 || edit.end_line < edit.start_line {
            return Err(stale("invalid line range"));
        }
        if edit.end_line > lines.len() {
            return Err(stale("range extends past the end of the file"));
        }
        if edit.end_line >= floor {
            return Err(stale("overlaps another edit"));
        }
        floor = edit.start_line;
    }

    for edit in ordered {
        let range = edit.start_line - 1..edit.end_line;
        match edit.replacement.as_deref() {
            Some(new_text) => {
                lines.splice(range, new_text.lines());
            }
            None => {
                lines.drain(range);
            }
        }
    }

    let mut out = lines.join(eol);
    if trailing_newline && !out.is_empty() {
        out.push_str(eol);
    }
    Ok(out)
}
