//! Analysis-summary codec
//!
//! Condenses the analyzer's JSON output into a short deterministic tag
//! string. Field resolution is identical for both render forms; only the
//! formatting differs. Partial key data always surfaces, either as a wheel
//! slot or as the literal "unknown", never as silence.

use crate::analysis::wheel;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Emitted when the analyzer's output file is missing on disk
pub const MISSING_SENTINEL: &str = "essentia:missing";

const COMPACT_PREFIX: &str = "essentia:";
const NO_SUMMARY: &str = "no-summary";
const UNKNOWN: &str = "unknown";

/// Danceability is clamped to this before rounding
const ENERGY_CEILING: f64 = 10.0;

/// Which rendering the caller wants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryFormat {
    /// `essentia:bpm=129;key=2B;chords=2B;energy=7`
    Compact,
    /// `Key: 2B Chords: 2B Energy: 7`
    Descriptive,
}

/// Summarize an analysis file, degrading to sentinels when it is missing or
/// unreadable.
pub fn summarize_file(json_path: &Path, format: SummaryFormat) -> String {
    if !json_path.exists() {
        return MISSING_SENTINEL.to_string();
    }

    let text = match fs::read_to_string(json_path) {
        Ok(text) => text,
        Err(e) => {
            warn!("Could not read analysis output {}: {}", json_path.display(), e);
            return MISSING_SENTINEL.to_string();
        }
    };

    let payload = match serde_json::from_str::<Value>(&text) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Malformed analysis output {}: {}", json_path.display(), e);
            Value::Null
        }
    };

    summarize(&payload, format)
}

/// Summarize an analysis payload. Pure function of the JSON value.
pub fn summarize(payload: &Value, format: SummaryFormat) -> String {
    let fields = SummaryFields::resolve(payload);
    match format {
        SummaryFormat::Compact => fields.compact(),
        SummaryFormat::Descriptive => fields.descriptive(),
    }
}

#[derive(Debug, Default)]
struct SummaryFields {
    bpm: Option<String>,
    key: Option<String>,
    chords: Option<String>,
    energy: Option<String>,
}

impl SummaryFields {
    fn resolve(payload: &Value) -> Self {
        let bpm = number_at(payload, &["rhythm", "bpm"]).map(|v| (v.round() as i64).to_string());
        let energy = number_at(payload, &["rhythm", "danceability"])
            .map(|v| (v.min(ENERGY_CEILING).round() as i64).to_string());
        let key = slot_or_unknown(payload, "key_key", "key_scale");
        let chords = slot_or_unknown(payload, "chords_key", "chords_scale");
        Self {
            bpm,
            key,
            chords,
            energy,
        }
    }

    fn compact(&self) -> String {
        let mut parts = Vec::new();
        if let Some(bpm) = &self.bpm {
            parts.push(format!("bpm={bpm}"));
        }
        if let Some(key) = &self.key {
            parts.push(format!("key={key}"));
        }
        if let Some(chords) = &self.chords {
            parts.push(format!("chords={chords}"));
        }
        if let Some(energy) = &self.energy {
            parts.push(format!("energy={energy}"));
        }

        if parts.is_empty() {
            format!("{COMPACT_PREFIX}{NO_SUMMARY}")
        } else {
            format!("{COMPACT_PREFIX}{}", parts.join(";"))
        }
    }

    fn descriptive(&self) -> String {
        let mut parts = Vec::new();
        if let Some(key) = &self.key {
            parts.push(format!("Key: {key}"));
        }
        if let Some(chords) = &self.chords {
            parts.push(format!("Chords: {chords}"));
        }
        if let Some(energy) = &self.energy {
            parts.push(format!("Energy: {energy}"));
        }
        parts.join(" ")
    }
}

fn nested<'a>(payload: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(payload, |value, key| value.get(key))
}

/// Numeric field, tolerating numbers encoded as strings
fn number_at(payload: &Value, keys: &[&str]) -> Option<f64> {
    let value = nested(payload, keys)?;
    if let Some(n) = value.as_f64() {
        return Some(n);
    }
    value.as_str()?.trim().parse().ok()
}

/// A value counts as present when it exists, is not null, and is not an
/// empty string.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Resolve a key/scale pair to a wheel slot, or "unknown" when data is
/// present but unresolvable.
fn slot_or_unknown(payload: &Value, key_field: &str, scale_field: &str) -> Option<String> {
    let key_value = nested(payload, &["tonal", key_field]);
    let scale_value = nested(payload, &["tonal", scale_field]);

    let resolved = match (
        key_value.and_then(Value::as_str),
        scale_value.and_then(Value::as_str),
    ) {
        (Some(key), Some(scale)) => wheel::wheel_slot(key, scale),
        _ => None,
    };

    match resolved {
        Some(slot) => Some(slot.to_string()),
        None if is_present(key_value) || is_present(scale_value) => Some(UNKNOWN.to_string()),
        None => None,
    }
}
