//! Set-list location and parsing
//!
//! A set list is a flat text file of title / artist / "[label year]" triplets,
//! optionally separated by rule lines of '=' characters. Parsing is a pure
//! function of the file contents: the same text always yields the same
//! ordered entries, and an empty or missing file is an error.

use crate::error::{PrepError, Result};
use crate::types::TrackEntry;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Locate the set list inside the target folder.
///
/// Preference order: a non-empty `*.txt` whose stem contains "raw", then the
/// first non-empty `.txt`, then any `.txt`. An explicit path bypasses the
/// search entirely.
pub fn find_set_file(set_dir: &Path, explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let mut txt_files: Vec<PathBuf> = fs::read_dir(set_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("txt"))
        })
        .collect();
    txt_files.sort();

    if txt_files.is_empty() {
        return Err(PrepError::SetFileNotFound(set_dir.to_path_buf()));
    }

    let non_empty = |path: &Path| fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);
    let is_raw = |path: &Path| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|s| s.to_lowercase().contains("raw"))
    };

    let chosen = txt_files
        .iter()
        .find(|p| is_raw(p) && non_empty(p))
        .or_else(|| txt_files.iter().find(|p| non_empty(p)))
        .or_else(|| txt_files.iter().find(|p| is_raw(p)))
        .unwrap_or(&txt_files[0]);

    debug!("Selected set list {}", chosen.display());
    Ok(chosen.clone())
}

/// Parse the set list into ordered track entries.
pub fn parse_set_file(set_file: &Path) -> Result<Vec<TrackEntry>> {
    let contents = fs::read_to_string(set_file)
        .map_err(|e| PrepError::malformed(set_file, format!("missing or unreadable: {e}")))?;

    if contents.trim().is_empty() {
        return Err(PrepError::malformed(set_file, "file is empty"));
    }

    parse_set_text(&contents).map_err(|reason| PrepError::malformed(set_file, reason))
}

fn parse_set_text(text: &str) -> std::result::Result<Vec<TrackEntry>, String> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_separator(line))
        .collect();

    if lines.len() % 3 != 0 {
        return Err(format!(
            "expected title/artist/[label year] triplets, found {} content lines",
            lines.len()
        ));
    }

    let entries = lines
        .chunks(3)
        .map(|triplet| {
            let (label, year) = parse_label_year(triplet[2]);
            TrackEntry {
                title: triplet[0].to_string(),
                artist: triplet[1].to_string(),
                label,
                year,
            }
        })
        .collect();

    Ok(entries)
}

/// Separator rule lines: 8 or more '=' characters and nothing else
fn is_separator(line: &str) -> bool {
    line.len() >= 8 && line.chars().all(|c| c == '=')
}

/// Split a "[label year]" line into its parts.
///
/// The year is a trailing 4-digit token starting "19" or "20"; whatever
/// precedes it, with trailing separators trimmed, is the label. Either part
/// may be absent.
pub fn parse_label_year(label_line: &str) -> (Option<String>, Option<String>) {
    let mut cleaned = label_line.trim();
    if cleaned.starts_with('[') && cleaned.ends_with(']') && cleaned.len() >= 2 {
        cleaned = cleaned[1..cleaned.len() - 1].trim();
    }

    if let Some(year) = trailing_year(cleaned) {
        let label = cleaned[..cleaned.len() - year.len()]
            .trim_end_matches(|c: char| c.is_whitespace() || c == '-' || c == ',' || c == '|')
            .trim();
        let label = (!label.is_empty()).then(|| label.to_string());
        return (label, Some(year));
    }

    ((!cleaned.is_empty()).then(|| cleaned.to_string()), None)
}

fn trailing_year(text: &str) -> Option<String> {
    let tail = text.get(text.len().saturating_sub(4)..)?;
    if tail.len() == 4
        && tail.chars().all(|c| c.is_ascii_digit())
        && (tail.starts_with("19") || tail.starts_with("20"))
    {
        Some(tail.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn parses_triplets_in_order() {
        let text = "Raise\nAzee Project\n[Ministry 2024]\n\nStrobe\ndeadmau5\n[2005]\n";
        let entries = parse_set_text(text).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Raise");
        assert_eq!(entries[0].artist, "Azee Project");
        assert_eq!(entries[0].label.as_deref(), Some("Ministry"));
        assert_eq!(entries[0].year.as_deref(), Some("2024"));
        assert_eq!(entries[1].title, "Strobe");
        assert_eq!(entries[1].label, None);
        assert_eq!(entries[1].year.as_deref(), Some("2005"));
    }

    #[test]
    fn strips_separator_rules() {
        let text = "====================\nRaise\nAzee Project\n[Ministry 2024]\n========\n";
        let entries = parse_set_text(text).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn rejects_non_triplet_counts() {
        let text = "Raise\nAzee Project\n[Ministry 2024]\nOrphan Title\n";
        assert!(parse_set_text(text).is_err());
    }

    #[test]
    fn empty_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("set.txt");
        fs::write(&path, "").unwrap();
        assert!(matches!(
            parse_set_file(&path),
            Err(PrepError::MalformedInput { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.txt");
        assert!(matches!(
            parse_set_file(&path),
            Err(PrepError::MalformedInput { .. })
        ));
    }

    #[test]
    fn label_year_splits() {
        assert_eq!(
            parse_label_year("Ministry 2024"),
            (Some("Ministry".to_string()), Some("2024".to_string()))
        );
        assert_eq!(parse_label_year("2024"), (None, Some("2024".to_string())));
        assert_eq!(
            parse_label_year("Ministry"),
            (Some("Ministry".to_string()), None)
        );
        assert_eq!(parse_label_year(""), (None, None));
    }

    #[test]
    fn label_year_handles_brackets_and_separators() {
        assert_eq!(
            parse_label_year("[Drumcode - 2019]"),
            (Some("Drumcode".to_string()), Some("2019".to_string()))
        );
        assert_eq!(parse_label_year("[]"), (None, None));
        // A trailing token not starting 19/20 is part of the label
        assert_eq!(
            parse_label_year("Catalogue 0042"),
            (Some("Catalogue 0042".to_string()), None)
        );
    }

    #[test]
    fn find_set_file_prefers_non_empty_raw() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a_set.txt"), "content").unwrap();
        fs::write(dir.path().join("set_raw.txt"), "raw content").unwrap();
        fs::write(dir.path().join("empty_raw.txt"), "").unwrap();
        let found = find_set_file(dir.path(), None).unwrap();
        assert_eq!(found.file_name().unwrap(), "set_raw.txt");
    }

    #[test]
    fn find_set_file_falls_back_to_first_non_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "content").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        let found = find_set_file(dir.path(), None).unwrap();
        assert_eq!(found.file_name().unwrap(), "b.txt");
    }

    #[test]
    fn find_set_file_errors_without_txt() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            find_set_file(dir.path(), None),
            Err(PrepError::SetFileNotFound(_))
        ));
    }
}
