//! Salvage parsing of model output
//!
//! Models often wrap their JSON in prose or markdown fences. Parsing is
//! two-stage: the whole string first, then the widest `{ ... }` span. No
//! grammar repair is attempted beyond that.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use sentinel_types::AnalysisResult;

lazy_static! {
    /// First `{` through last `}`, across newlines
    static ref JSON_OBJECT_PATTERN: Regex = Regex::new(r"(?s)\{.*\}").unwrap();
}

/// Recover a JSON value from raw model output
pub fn clean_json(raw_text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(raw_text) {
        return Some(value);
    }

    let candidate = JSON_OBJECT_PATTERN.find(raw_text)?;
    serde_json::from_str(candidate.as_str()).ok()
}

/// Recover an [`AnalysisResult`] from raw model output
///
/// Returns `None` unless the salvaged value is a non-empty JSON object.
pub fn parse_analysis(raw_text: &str) -> Option<AnalysisResult> {
    match clean_json(raw_text)? {
        Value::Object(map) if !map.is_empty() => serde_json::from_value(Value::Object(map)).ok(),
        _ => None,
    }
}
