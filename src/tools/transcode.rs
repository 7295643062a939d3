//! Transcoding stage
//!
//! Converts a source file to the fixed-bit-depth intermediate the rest of
//! the pipeline works on (24-bit PCM AIFF).

use crate::error::Result;
use crate::tools::runner::{run_tool, ToolCommand};
use std::path::{Path, PathBuf};

const INTERMEDIATE_EXT: &str = "aiff";
const CODEC: &str = "pcm_s24be";

/// Build the transcoder command line for one file
pub fn transcode_command(exe: &Path, input: &Path, output: &Path) -> ToolCommand {
    ToolCommand::new("transcoder", exe)
        .arg("-y")
        .arg("-i")
        .arg_path(input)
        .arg("-c:a")
        .arg(CODEC)
        .arg_path(output)
}

/// Transcode `input` into `output_dir`, returning the declared output path.
pub fn convert(
    exe: &Path,
    input: &Path,
    output_dir: &Path,
    track: &str,
    dry_run: bool,
) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let output = output_dir.join(format!("{stem}.{INTERMEDIATE_EXT}"));
    let log_path = output.with_extension("transcode.log");

    let cmd = transcode_command(exe, input, &output);
    run_tool(&cmd, track, &log_path, dry_run)?;
    Ok(output)
}
