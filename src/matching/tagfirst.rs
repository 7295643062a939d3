//! File-driven matching: embedded tags first, ordinal position second
//!
//! Each discovered file, in sorted order, claims the unused entry whose
//! normalized title and artist equal its embedded tags (filename stem stands
//! in for a missing title). Failing that, it claims the entry at its own
//! position in the file list, if still unused. This strategy never prompts
//! and never substring-scores.

use crate::matching::{normalize, MatchReport};
use crate::tags;
use crate::types::{MatchBasis, MatchedTrack, SourceFile, TrackEntry};
use tracing::debug;

/// Title/artist actually embedded in a candidate file
#[derive(Debug, Clone, Default)]
pub struct EmbeddedIdentity {
    pub title: Option<String>,
    pub artist: Option<String>,
}

/// Match files against the entry pool using their embedded tags.
pub fn match_files(entries: &[TrackEntry], files: &[SourceFile]) -> MatchReport {
    let identities: Vec<EmbeddedIdentity> = files
        .iter()
        .map(|file| {
            let map = tags::read_tag_map(&file.path);
            EmbeddedIdentity {
                title: first_value(&map, tags::FIELD_TITLE),
                artist: first_value(&map, tags::FIELD_ARTIST),
            }
        })
        .collect();

    match_files_with_identities(entries, files, &identities)
}

fn first_value(map: &crate::types::TagMap, key: &str) -> Option<String> {
    map.get(key).and_then(|values| values.first()).cloned()
}

/// Core matching over pre-extracted identities (separated for testability).
pub fn match_files_with_identities(
    entries: &[TrackEntry],
    files: &[SourceFile],
    identities: &[EmbeddedIdentity],
) -> MatchReport {
    let mut used = vec![false; entries.len()];
    let mut report = MatchReport::default();

    for (file_idx, file) in files.iter().enumerate() {
        let identity = identities.get(file_idx).cloned().unwrap_or_default();
        let title = identity.title.as_deref().unwrap_or(&file.stem);
        let title_key = normalize(title);
        let artist_key = identity.artist.as_deref().map(normalize).unwrap_or_default();

        let exact = (!title_key.is_empty() && !artist_key.is_empty())
            .then(|| {
                entries.iter().enumerate().find(|(idx, entry)| {
                    !used[*idx]
                        && normalize(&entry.title) == title_key
                        && normalize(&entry.artist) == artist_key
                })
            })
            .flatten()
            .map(|(idx, _)| idx);

        let claim = match exact {
            Some(idx) => Some((idx, MatchBasis::ExactTags)),
            None if file_idx < entries.len() && !used[file_idx] => {
                Some((file_idx, MatchBasis::Sequential))
            }
            None => None,
        };

        match claim {
            Some((entry_idx, basis)) => {
                debug!(
                    "Matched {} to '{}' ({})",
                    file.file_name(),
                    entries[entry_idx].describe(),
                    basis
                );
                used[entry_idx] = true;
                report.matched.push(MatchedTrack {
                    entry: entries[entry_idx].clone(),
                    file: file.clone(),
                    basis,
                });
            }
            None => report.unmatched_files.push(file.clone()),
        }
    }

    report.unmatched_entries = entries
        .iter()
        .zip(&used)
        .filter(|(_, used)| !**used)
        .map(|(entry, _)| entry.clone())
        .collect();

    report
}
