//! Camelot wheel mapping
//!
//! The Camelot Wheel is a visual representation of musical keys that makes
//! harmonic mixing intuitive for DJs:
//!
//! - Numbers 1-12 represent positions on the wheel
//! - 'A' suffix = minor key, 'B' suffix = major key
//! - Adjacent numbers are harmonically compatible (perfect fifth)
//!
//! The table is keyed on the analyzer's string spellings, so enharmonic pairs
//! (F#/Gb, C#/Db, ...) map to the same slot. Key letters are matched as the
//! analyzer emits them; the scale is case-insensitive.

/// Map a (key, scale) pair to its wheel slot, e.g. ("F#", "major") -> "2B".
pub fn wheel_slot(key: &str, scale: &str) -> Option<&'static str> {
    match scale.to_ascii_lowercase().as_str() {
        "major" => major_slot(key),
        "minor" => minor_slot(key),
        _ => None,
    }
}

fn major_slot(key: &str) -> Option<&'static str> {
    match key {
        "B" => Some("1B"),
        "F#" | "Gb" => Some("2B"),
        "Db" | "C#" => Some("3B"),
        "Ab" | "G#" => Some("4B"),
        "Eb" | "D#" => Some("5B"),
        "Bb" | "A#" => Some("6B"),
        "F" => Some("7B"),
        "C" => Some("8B"),
        "G" => Some("9B"),
        "D" => Some("10B"),
        "A" => Some("11B"),
        "E" => Some("12B"),
        _ => None,
    }
}

fn minor_slot(key: &str) -> Option<&'static str> {
    match key {
        "Ab" | "G#" => Some("1A"),
        "Eb" | "D#" => Some("2A"),
        "Bb" | "A#" => Some("3A"),
        "F" => Some("4A"),
        "C" => Some("5A"),
        "G" => Some("6A"),
        "D" => Some("7A"),
        "A" => Some("8A"),
        "E" => Some("9A"),
        "B" => Some("10A"),
        "F#" | "Gb" => Some("11A"),
        "C#" | "Db" => Some("12A"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const NATURALS_AND_SHARPS: [&str; 12] = [
        "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
    ];

    #[test]
    fn all_twelve_slots_per_scale() {
        for scale in ["major", "minor"] {
            let slots: HashSet<&str> = NATURALS_AND_SHARPS
                .iter()
                .map(|key| wheel_slot(key, scale).unwrap())
                .collect();
            assert_eq!(slots.len(), 12, "scale {scale} should cover 12 slots");
        }
    }

    #[test]
    fn enharmonic_spellings_share_a_slot() {
        assert_eq!(wheel_slot("F#", "major"), Some("2B"));
        assert_eq!(wheel_slot("Gb", "major"), Some("2B"));
        assert_eq!(wheel_slot("F#", "minor"), Some("11A"));
        assert_eq!(wheel_slot("Gb", "minor"), Some("11A"));
        assert_eq!(wheel_slot("Db", "major"), wheel_slot("C#", "major"));
    }

    #[test]
    fn common_reference_points() {
        assert_eq!(wheel_slot("A", "minor"), Some("8A"));
        assert_eq!(wheel_slot("C", "major"), Some("8B"));
        assert_eq!(wheel_slot("G", "minor"), Some("6A"));
    }

    #[test]
    fn scale_is_case_insensitive_but_key_is_not() {
        assert_eq!(wheel_slot("C", "Major"), Some("8B"));
        assert_eq!(wheel_slot("c", "major"), None);
    }

    #[test]
    fn unknown_inputs_yield_none() {
        assert_eq!(wheel_slot("H", "major"), None);
        assert_eq!(wheel_slot("C", "dorian"), None);
        assert_eq!(wheel_slot("", ""), None);
    }
}
