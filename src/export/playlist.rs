//! Import helper script
//!
//! Importing the processed files into the player and building the playlist
//! stays a manual step; this writes a small script that lists the files so
//! the operator does not have to.

use crate::error::{PrepError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const SCRIPT_NAME: &str = "import_playlist.ps1";

/// Write the helper script into the target folder. Returns `None` in dry-run.
pub fn write_import_script(
    target: &Path,
    files: &[PathBuf],
    dry_run: bool,
) -> Result<Option<PathBuf>> {
    let script_path = target.join(SCRIPT_NAME);

    if dry_run {
        println!(
            "[dry-run] would write {} listing {} files",
            script_path.display(),
            files.len()
        );
        return Ok(None);
    }

    let mut lines = vec![
        "# Manual step: import the processed files into the player and build the set playlist"
            .to_string(),
        "$playlistName = Read-Host 'Playlist name'".to_string(),
        "$setFiles = @(".to_string(),
    ];
    lines.extend(files.iter().map(|path| format!("    \"{}\"", path.display())));
    lines.extend([
        ")".to_string(),
        "Write-Host 'Import these files and add them to the playlist:' -ForegroundColor Cyan"
            .to_string(),
        "$setFiles | ForEach-Object { Write-Host $_ }".to_string(),
        "Write-Host \"Suggested playlist name: $playlistName\" -ForegroundColor Yellow".to_string(),
    ]);

    fs::write(&script_path, lines.join("\n") + "\n")
        .map_err(|e| PrepError::output_error(&script_path, e))?;

    info!("Wrote import helper script {}", script_path.display());
    Ok(Some(script_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn script_lists_every_file() {
        let dir = TempDir::new().unwrap();
        let files = vec![
            PathBuf::from("/target/mastered/a.aiff"),
            PathBuf::from("/target/mastered/b.aiff"),
        ];
        let script = write_import_script(dir.path(), &files, false)
            .unwrap()
            .unwrap();

        let text = fs::read_to_string(&script).unwrap();
        assert!(text.contains("/target/mastered/a.aiff"));
        assert!(text.contains("/target/mastered/b.aiff"));
        assert!(text.contains("Read-Host"));
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let result = write_import_script(dir.path(), &[], true).unwrap();
        assert!(result.is_none());
        assert!(!dir.path().join(SCRIPT_NAME).exists());
    }
}
