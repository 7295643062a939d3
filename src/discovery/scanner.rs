//! File discovery and scanning

use crate::error::Result;
use crate::types::{AudioFormat, SourceFile};
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Scan a directory tree for candidate audio files.
///
/// Results are sorted by path so file order, and with it the tag-first
/// matcher's sequential fallback, is deterministic across runs.
pub fn scan(source_dir: &Path) -> Result<Vec<SourceFile>> {
    let mut files: Vec<SourceFile> = WalkDir::new(source_dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| try_discover_file(entry.path()))
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));

    info!("Discovered {} audio files", files.len());

    if files.is_empty() {
        warn!("No supported audio files found in {}", source_dir.display());
    }

    Ok(files)
}

/// Build a SourceFile if the path has a supported audio extension
fn try_discover_file(path: &Path) -> Option<SourceFile> {
    let ext = path.extension()?.to_str()?;
    let format = AudioFormat::from_extension(ext)?;
    debug!("Discovered: {}", path.display());
    Some(SourceFile::new(path.to_path_buf(), format))
}
