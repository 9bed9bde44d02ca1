//! Structural validation of model responses.
//!
//! The model is untrusted: even with a response schema attached to the
//! request, nothing guarantees the returned JSON has the promised shape.
//! Every field is checked here before any other code reads it.

use serde_json::Value;

/// The five keys every evaluation must carry.
pub const REQUIRED_KEYS: [&str; 5] = [
    "match_score",
    "summary",
    "strengths",
    "missing_requirements",
    "verdict",
];

/// The exact verdict strings the contract allows.
pub const VERDICTS: [&str; 3] = ["strong match", "possible match", "not a match"];

/// Pure structural predicate over a parsed response.
///
/// Checks per-field shape only: element types inside the two arrays are
/// not inspected, and no cross-check of `verdict` against the
/// `match_score` band is performed. Both are deliberate contract gaps.
pub fn is_valid_evaluation(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };

    for key in REQUIRED_KEYS {
        if !obj.contains_key(key) {
            return false;
        }
    }

    match obj["match_score"].as_i64() {
        Some(n) if (0..=100).contains(&n) => {}
        _ => return false,
    }

    if !obj["summary"].is_string() {
        return false;
    }

    if !obj["strengths"].is_array() || !obj["missing_requirements"].is_array() {
        return false;
    }

    matches!(obj["verdict"].as_str(), Some(v) if VERDICTS.contains(&v))
}
