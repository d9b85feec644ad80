use crate::parse::common::ImportRecord;
use serde::Serialize;

/// Why a diagnostic engine considers an import unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnusedReason {
    NeverReferenced,
    ShadowedByLocal,
    TypeOnlyUnused,
    DuplicateImport,
    Unknown,
}

impl std::fmt::Display for UnusedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnusedReason::NeverReferenced => write!(f, "Never referenced"),
            UnusedReason::ShadowedByLocal => write!(f, "Shadowed by local binding"),
            UnusedReason::TypeOnlyUnused => write!(f, "Type-only import unused"),
            UnusedReason::DuplicateImport => write!(f, "Duplicate import"),
            UnusedReason::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Substring (lowercase) → reason. Checked in order, so specific phrases come
/// before generic ones.
pub type ReasonTable = &'static [(&'static str, UnusedReason)];

pub const COMMON_REASONS: ReasonTable = &[
    ("shadow", UnusedReason::ShadowedByLocal),
    ("redefinition of unused", UnusedReason::ShadowedByLocal),
    ("only used as a type", UnusedReason::TypeOnlyUnused),
    ("only used as types", UnusedReason::TypeOnlyUnused),
    ("type-only", UnusedReason::TypeOnlyUnused),
    ("duplicate", UnusedReason::DuplicateImport),
    ("imported multiple times", UnusedReason::DuplicateImport),
    ("imported redundantly", UnusedReason::DuplicateImport),
    ("redundant", UnusedReason::DuplicateImport),
    ("never used", UnusedReason::NeverReferenced),
    ("never read", UnusedReason::NeverReferenced),
    ("not used", UnusedReason::NeverReferenced),
    ("not accessed", UnusedReason::NeverReferenced),
    ("unused", UnusedReason::NeverReferenced),
    ("unnecessary", UnusedReason::NeverReferenced),
];

/// Classify a free-text diagnostic message. Language tables win over the
/// common table.
pub fn classify(message: &str, language: ReasonTable) -> UnusedReason {
    let lowered = message.to_lowercase();
    language
        .iter()
        .chain(COMMON_REASONS.iter())
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, reason)| *reason)
        .unwrap_or(UnusedReason::Unknown)
}

/// Render the human-readable explanation for an unused import. `unused`
/// empty means the whole statement.
pub fn render(
    reason: UnusedReason,
    record: &ImportRecord,
    unused: &[String],
    has_side_effects: bool,
) -> String {
    let symbols = if unused.is_empty() {
        record.symbols()
    } else {
        unused
    };
    let subject = if symbols.is_empty() {
        format!("import of {}", record.source())
    } else {
        format!("{} from {}", symbols.join(", "), record.source())
    };
    let safety = if has_side_effects {
        "Not safe to remove automatically: the import may have side effects."
    } else {
        "Safe to remove."
    };
    format!("{reason}: {subject}. {safety}")
}
