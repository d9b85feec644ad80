use crate::parse::common::ImportRecord;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// An upstream "unused/unnecessary" diagnostic anchored at a line.
///
/// Hosts adapt their own diagnostic events into this shape. `line` is
/// 1-indexed. Numeric codes are carried as their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub file: PathBuf,
    pub line: usize,
    pub message: String,
    /// The host tagged this diagnostic as "unnecessary" (faded code).
    pub unnecessary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Marker {
    /// An unnecessary-tagged marker with no origin or code.
    pub fn unused(file: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            message: message.into(),
            unnecessary: true,
            origin: None,
            code: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// An import statement judged unused in one analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnusedImportRecord {
    import_record: ImportRecord,
    source_marker: Marker,
    unused_symbols: Vec<String>,
    has_side_effects: bool,
    confidence: f64,
    explanation: String,
}

impl UnusedImportRecord {
    /// Build a record. Names in `unused_symbols` that the statement does not
    /// bind are dropped (duplicates too), keeping the statement's own order.
    pub fn new(
        import_record: ImportRecord,
        source_marker: Marker,
        unused_symbols: Vec<String>,
        has_side_effects: bool,
        confidence: f64,
        explanation: impl Into<String>,
    ) -> Self {
        let unused_symbols = import_record
            .symbols()
            .iter()
            .filter(|s| unused_symbols.contains(s))
            .fold(Vec::<String>::new(), |mut acc, s| {
                if !acc.contains(s) {
                    acc.push(s.clone());
                }
                acc
            });
        Self {
            import_record,
            source_marker,
            unused_symbols,
            has_side_effects,
            confidence: if confidence.is_finite() {
                confidence.clamp(0.0, 1.0)
            } else {
                0.0
            },
            explanation: explanation.into(),
        }
    }

    pub fn import_record(&self) -> &ImportRecord {
        &self.import_record
    }

    pub fn source_marker(&self) -> &Marker {
        &self.source_marker
    }

    pub fn unused_symbols(&self) -> &[String] {
        &self.unused_symbols
    }

    pub fn has_side_effects(&self) -> bool {
        self.has_side_effects
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn file(&self) -> &Path {
        &self.source_marker.file
    }

    /// The whole statement is unused, not just some of its bindings.
    pub fn is_whole_statement(&self) -> bool {
        self.unused_symbols.is_empty()
            || self.unused_symbols.len() == self.import_record.symbols().len()
    }

    /// Names to report: the unused subset, or every binding when the whole
    /// statement is unused.
    pub fn reported_symbols(&self) -> &[String] {
        if self.unused_symbols.is_empty() {
            self.import_record.symbols()
        } else {
            &self.unused_symbols
        }
    }
}
