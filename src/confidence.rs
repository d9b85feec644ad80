use crate::diagnostic::Marker;
use crate::parse::{ImportGrammar, ImportRecord};
use serde::{Deserialize, Serialize};

/// Coefficients of the confidence score. Applied in field order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceWeights {
    pub base: f64,
    pub side_effect_penalty: f64,
    pub known_origin_boost: f64,
    pub unknown_source_penalty: f64,
    pub unused_code_boost: f64,
    /// Ceiling applied after each boost.
    pub cap: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            base: 0.9,
            side_effect_penalty: 0.7,
            known_origin_boost: 1.1,
            unknown_source_penalty: 0.6,
            unused_code_boost: 1.2,
            cap: 0.99,
        }
    }
}

/// Facts about one finding that move its confidence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub has_side_effects: bool,
    pub known_origin: bool,
    pub unknown_source: bool,
    pub unused_code: bool,
}

impl Signals {
    /// Derive the signals from a marker and the statement it points into.
    pub fn collect(
        grammar: &dyn ImportGrammar,
        marker: &Marker,
        record: &ImportRecord,
        has_side_effects: bool,
    ) -> Self {
        let known_origin = marker.origin.as_deref().is_some_and(|origin| {
            grammar
                .known_origins()
                .iter()
                .any(|known| known.eq_ignore_ascii_case(origin.trim()))
        });
        let unused_code = marker.code.as_deref().is_some_and(|code| {
            grammar
                .unused_codes()
                .iter()
                .any(|known| known.eq_ignore_ascii_case(code.trim()))
        });
        Self {
            has_side_effects,
            known_origin,
            unknown_source: record.has_unknown_source(),
            unused_code,
        }
    }
}

/// Confidence in `[0, 1]` that removing the import is correct.
pub fn score(weights: &ConfidenceWeights, signals: Signals) -> f64 {
    let mut confidence = weights.base;
    if signals.has_side_effects {
        confidence *= weights.side_effect_penalty;
    }
    if signals.known_origin {
        confidence = (confidence * weights.known_origin_boost).min(weights.cap);
    }
    if signals.unknown_source {
        confidence *= weights.unknown_source_penalty;
    }
    if signals.unused_code {
        confidence = (confidence * weights.unused_code_boost).min(weights.cap);
    }
    if confidence.is_finite() {
        confidence.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
