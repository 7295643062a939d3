//! Core data types for setprep
//!
//! These types represent the domain model and flow through the pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

// =============================================================================
// Set list entries
// =============================================================================

/// One desired track from the curated set list, independent of any file.
///
/// Parsed from three consecutive non-blank lines: title, artist, "[label year]".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackEntry {
    pub title: String,
    pub artist: String,
    pub label: Option<String>,
    pub year: Option<String>,
}

impl TrackEntry {
    /// "Artist - Title" form for logs and prompts
    pub fn describe(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }
}

// =============================================================================
// Candidate files
// =============================================================================

/// Audio formats accepted as pipeline sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
    Flac,
    Aiff,
}

impl AudioFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "wav" => Some(AudioFormat::Wav),
            "flac" => Some(AudioFormat::Flac),
            "aiff" | "aif" => Some(AudioFormat::Aiff),
            _ => None,
        }
    }

    /// Check if a path has a supported extension
    pub fn is_supported_path(path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .is_some()
    }
}

/// A discovered candidate source file
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Filename without extension, used for matching
    pub stem: String,
    pub format: AudioFormat,
}

impl SourceFile {
    pub fn new(path: PathBuf, format: AudioFormat) -> Self {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        Self { path, stem, format }
    }

    /// Filename including extension, for prompts and reports
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string()
    }
}

// =============================================================================
// Matching
// =============================================================================

/// How a track entry and file were paired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBasis {
    /// Embedded title+artist matched an entry exactly (tag-first strategy)
    ExactTags,
    /// Best substring score against the filename stem (scored strategy)
    Scored,
    /// Entry at the same ordinal position as the file (tag-first fallback)
    Sequential,
}

impl fmt::Display for MatchBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchBasis::ExactTags => write!(f, "exact-tags"),
            MatchBasis::Scored => write!(f, "scored"),
            MatchBasis::Sequential => write!(f, "sequential"),
        }
    }
}

/// A resolved (entry, file) pair ready for the pipeline
#[derive(Debug, Clone)]
pub struct MatchedTrack {
    pub entry: TrackEntry,
    pub file: SourceFile,
    pub basis: MatchBasis,
}

// =============================================================================
// Tag snapshots
// =============================================================================

/// Fixed-field tag snapshot: field name to list of values.
///
/// A BTreeMap keeps serialization order stable across runs.
pub type TagMap = BTreeMap<String, Vec<String>>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn format_detection_covers_aif_alias() {
        assert_eq!(AudioFormat::from_extension("aif"), Some(AudioFormat::Aiff));
        assert_eq!(AudioFormat::from_extension("AIFF"), Some(AudioFormat::Aiff));
        assert_eq!(AudioFormat::from_extension("ogg"), None);
    }

    #[test]
    fn supported_path_check() {
        assert!(AudioFormat::is_supported_path(Path::new("/x/track.mp3")));
        assert!(!AudioFormat::is_supported_path(Path::new("/x/track.txt")));
        assert!(!AudioFormat::is_supported_path(Path::new("/x/noext")));
    }

    #[test]
    fn source_file_stem() {
        let file = SourceFile::new(PathBuf::from("/music/Azee_Project-Raise.mp3"), AudioFormat::Mp3);
        assert_eq!(file.stem, "Azee_Project-Raise");
        assert_eq!(file.file_name(), "Azee_Project-Raise.mp3");
    }
}
