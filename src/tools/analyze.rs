//! Acoustic-analysis stage
//!
//! Invokes the external analyzer once per rendered file; the analyzer
//! declares its JSON output location as its second argument.

use crate::error::Result;
use crate::tools::runner::{run_tool, ToolCommand};
use std::path::{Path, PathBuf};

/// Analyze `input`, returning the declared JSON output path.
pub fn analyze(exe: &Path, input: &Path, track: &str, dry_run: bool) -> Result<PathBuf> {
    let json_path = input.with_extension("json");
    let log_path = input.with_extension("analyze.log");

    let cmd = ToolCommand::new("analyzer", exe)
        .arg_path(input)
        .arg_path(&json_path);
    run_tool(&cmd, track, &log_path, dry_run)?;
    Ok(json_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_path_sits_next_to_input() {
        let json = analyze(
            Path::new("streaming_extractor_music"),
            Path::new("/target/mastered/Raise.aiff"),
            "Azee Project - Raise",
            true,
        )
        .unwrap();
        assert_eq!(json, Path::new("/target/mastered/Raise.json"));
    }
}
