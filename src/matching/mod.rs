//! Entry-to-file matching
//!
//! Two strategies pair set-list entries with discovered files:
//!
//! - `score`: entry-driven substring scoring against filename stems, with a
//!   pluggable resolver for uncertain matches
//! - `tagfirst`: file-driven, trusting embedded tags first and ordinal
//!   position second; never prompts
//!
//! Both guarantee that no file and no entry is used twice, and that anything
//! left unmatched is reported rather than dropped.

pub mod resolver;
pub mod score;
pub mod tagfirst;

pub use resolver::{AutoResolver, MatchResolver, PromptResolver, Resolution};

use crate::types::{MatchedTrack, SourceFile, TrackEntry};

/// Outcome of one matching pass over the whole run
#[derive(Debug, Default)]
pub struct MatchReport {
    pub matched: Vec<MatchedTrack>,
    pub unmatched_entries: Vec<TrackEntry>,
    pub unmatched_files: Vec<SourceFile>,
}

/// Strip everything but lowercase alphanumerics, for fuzzy-insensitive
/// comparisons of titles, artists, and filename stems.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize("Azee Project - Raise!"), "azeeprojectraise");
        assert_eq!(normalize("deadmau5"), "deadmau5");
        assert_eq!(normalize("---"), "");
    }
}
