//! Entry-driven candidate scoring
//!
//! For each set-list entry, every unused file is scored by whether the
//! normalized title and artist appear as substrings of the normalized
//! filename stem. Confident matches are taken directly; everything else goes
//! through the run's resolver.

use crate::matching::resolver::{MatchResolver, Resolution};
use crate::matching::{normalize, MatchReport};
use crate::types::{MatchBasis, MatchedTrack, SourceFile, TrackEntry};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::debug;

const TITLE_HIT: u32 = 2;
const ARTIST_HIT: u32 = 1;
/// Anything below a full title+artist hit is uncertain
const CONFIDENT_SCORE: u32 = TITLE_HIT + ARTIST_HIT;

/// A candidate file with its match score
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'a> {
    pub score: u32,
    pub file: &'a SourceFile,
}

/// Score all unused candidates for one entry, best first.
///
/// Ties break on filename, case-insensitively, so ranking is deterministic.
pub fn score_candidates<'a>(
    entry: &TrackEntry,
    files: &'a [SourceFile],
    used: &HashSet<PathBuf>,
) -> Vec<ScoredCandidate<'a>> {
    let title_key = normalize(&entry.title);
    let artist_key = normalize(&entry.artist);

    let mut scored: Vec<ScoredCandidate<'a>> = files
        .iter()
        .filter(|file| !used.contains(&file.path))
        .filter_map(|file| {
            let stem = normalize(&file.stem);
            let mut score = 0;
            if !title_key.is_empty() && stem.contains(&title_key) {
                score += TITLE_HIT;
            }
            if !artist_key.is_empty() && stem.contains(&artist_key) {
                score += ARTIST_HIT;
            }
            (score > 0).then_some(ScoredCandidate { score, file })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score.cmp(&a.score).then_with(|| {
            a.file
                .file_name()
                .to_lowercase()
                .cmp(&b.file.file_name().to_lowercase())
        })
    });
    scored
}

/// A match is uncertain when there is no candidate, the top score is tied,
/// or the top score is below the confidence floor.
pub fn is_uncertain(scored: &[ScoredCandidate<'_>]) -> bool {
    match scored.first() {
        None => true,
        Some(top) => {
            let ties = scored.iter().filter(|c| c.score == top.score).count();
            ties > 1 || top.score < CONFIDENT_SCORE
        }
    }
}

/// Match every entry against the candidate pool, first-match-wins.
pub fn match_entries(
    entries: &[TrackEntry],
    files: &[SourceFile],
    resolver: &dyn MatchResolver,
) -> MatchReport {
    let mut used: HashSet<PathBuf> = HashSet::new();
    let mut report = MatchReport::default();

    for entry in entries {
        let scored = score_candidates(entry, files, &used);

        let chosen = if scored.is_empty() {
            println!("[no match] {}", entry.describe());
            None
        } else if !is_uncertain(&scored) {
            debug!("Confident match for {}: {}", entry.describe(), scored[0].file.file_name());
            Some(scored[0].file)
        } else {
            let preview: Vec<String> = scored.iter().take(3).map(|c| c.file.file_name()).collect();
            println!(
                "[unsure] {} -> best score {}; candidates: {}",
                entry.describe(),
                scored[0].score,
                preview.join(", ")
            );
            match resolver.resolve(entry, &scored) {
                Resolution::Accept(idx) => Some(scored[idx].file),
                Resolution::Skip => None,
            }
        };

        match chosen {
            Some(file) => {
                used.insert(file.path.clone());
                report.matched.push(MatchedTrack {
                    entry: entry.clone(),
                    file: file.clone(),
                    basis: MatchBasis::Scored,
                });
            }
            None => report.unmatched_entries.push(entry.clone()),
        }
    }

    report.unmatched_files = files
        .iter()
        .filter(|file| !used.contains(&file.path))
        .cloned()
        .collect();

    report
}
