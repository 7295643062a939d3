//! Processed-metadata manifest
//!
//! One JSON object per line. Key order is fixed (struct field order; tag
//! snapshots are BTreeMaps), so identical inputs rewrite byte-identically.
//!
//! Records are appended and flushed as each track completes, so a mid-batch
//! failure keeps every previously recorded track; the in-flight track writes
//! nothing. In dry-run mode lines go to stdout instead of disk, same shape
//! and order.

use crate::error::{PrepError, Result};
use crate::pipeline::track::TrackState;
use crate::types::{MatchBasis, SourceFile, TagMap, TrackEntry};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub const MANIFEST_FILE_NAME: &str = "set_manifest.jsonl";

/// One line of the manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum ManifestRecord {
    Track(TrackRecord),
    UnmatchedEntry {
        title: String,
        artist: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        year: Option<String>,
    },
    UnmatchedFile {
        path: String,
    },
}

impl ManifestRecord {
    pub fn unmatched_entry(entry: &TrackEntry) -> Self {
        ManifestRecord::UnmatchedEntry {
            title: entry.title.clone(),
            artist: entry.artist.clone(),
            label: entry.label.clone(),
            year: entry.year.clone(),
        }
    }

    pub fn unmatched_file(file: &SourceFile) -> Self {
        ManifestRecord::UnmatchedFile {
            path: file.path.display().to_string(),
        }
    }
}

/// Everything known about one track that reached the end of the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRecord {
    pub title: String,
    pub artist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    pub match_basis: MatchBasis,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendered: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_json: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub source_tags: TagMap,
    pub final_tags: TagMap,
}

impl TrackRecord {
    pub fn from_state(state: &TrackState) -> Self {
        let display = |path: &PathBuf| path.display().to_string();
        Self {
            title: state.entry.title.clone(),
            artist: state.entry.artist.clone(),
            label: state.entry.label.clone(),
            year: state.entry.year.clone(),
            match_basis: state.basis,
            source: display(&state.source.path),
            converted: state.converted.as_ref().map(display),
            rendered: state.rendered.as_ref().map(display),
            analysis_json: state.analysis_json.as_ref().map(display),
            summary: state.summary.clone(),
            source_tags: state.source_tags.clone(),
            final_tags: state.final_tags.clone(),
        }
    }
}

/// Incremental newline-delimited JSON writer
pub struct ManifestWriter {
    out: Option<BufWriter<File>>,
    path: PathBuf,
    records: usize,
}

impl ManifestWriter {
    /// Create (truncating) the manifest, or a stdout-only writer in dry-run.
    pub fn create(path: &Path, dry_run: bool) -> Result<Self> {
        let out = if dry_run {
            None
        } else {
            let file = File::create(path).map_err(|e| PrepError::output_error(path, e))?;
            Some(BufWriter::new(file))
        };
        Ok(Self {
            out,
            path: path.to_path_buf(),
            records: 0,
        })
    }

    /// Append one record as a single line and flush it to disk.
    pub fn append(&mut self, record: &ManifestRecord) -> Result<()> {
        let line = serde_json::to_string(record).map_err(|e| PrepError::OutputError {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        match &mut self.out {
            Some(out) => {
                writeln!(out, "{line}")?;
                out.flush()?;
            }
            None => println!("{line}"),
        }
        self.records += 1;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        if let Some(out) = self.out.as_mut() {
            out.flush()?;
            info!("Wrote {} manifest records to {}", self.records, self.path.display());
        }
        Ok(())
    }
}
