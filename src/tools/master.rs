//! Mastering stage
//!
//! Three ways to advance a converted file to its rendered form: a per-file
//! headless render, one batch invocation over a directive file, or a
//! byte-for-byte passthrough copy when mastering is skipped.
//!
//! The batch tool's exit code is not trusted on its own: its captured log
//! must contain the completion marker and none of the failure markers, or
//! the run aborts.

use crate::error::{PrepError, Result};
use crate::tools::runner::{run_tool, ToolCommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const BATCH_DIRECTIVE_NAME: &str = "batch_render.txt";
const BATCH_LOG_NAME: &str = "batch_render.log";

/// The batch tool prints this once every listed file rendered
pub const BATCH_COMPLETE_MARKER: &str = "Batch render complete";
/// Any of these in the batch log aborts the run, regardless of exit code
pub const BATCH_FAILURE_MARKERS: [&str; 3] = ["FAIL", "ERROR", "Can't open"];

/// Render one file through the mastering processor.
pub fn master_file(
    exe: &Path,
    preset: &str,
    input: &Path,
    output_dir: &Path,
    track: &str,
    dry_run: bool,
) -> Result<PathBuf> {
    let output = output_dir.join(input.file_name().unwrap_or_default());
    let log_path = output.with_extension("master.log");

    let cmd = ToolCommand::new("mastering", exe)
        .arg("--headless")
        .arg("--preset")
        .arg(preset)
        .arg("--input")
        .arg_path(input)
        .arg("--output")
        .arg_path(&output);
    run_tool(&cmd, track, &log_path, dry_run)?;
    Ok(output)
}

/// Byte-for-byte copy standing in for the mastering tool.
pub fn passthrough(input: &Path, output_dir: &Path, dry_run: bool) -> Result<PathBuf> {
    let output = output_dir.join(input.file_name().unwrap_or_default());
    if dry_run {
        println!(
            "[dry-run] passthrough copy: {} -> {}",
            input.display(),
            output.display()
        );
    } else {
        fs::copy(input, &output).map_err(|e| PrepError::output_error(&output, e))?;
        debug!("Copied {} -> {}", input.display(), output.display());
    }
    Ok(output)
}

/// Render all pending converted files in one batch invocation.
///
/// Inputs and their declared outputs are listed in a directive file the tool
/// consumes; the captured log is validated afterwards.
pub fn master_batch(
    exe: &Path,
    preset: &str,
    inputs: &[PathBuf],
    output_dir: &Path,
    dry_run: bool,
) -> Result<Vec<PathBuf>> {
    let outputs: Vec<PathBuf> = inputs
        .iter()
        .map(|input| output_dir.join(input.file_name().unwrap_or_default()))
        .collect();

    let directive_path = output_dir.join(BATCH_DIRECTIVE_NAME);
    let log_path = output_dir.join(BATCH_LOG_NAME);

    if dry_run {
        println!(
            "[dry-run] batch directive {} ({} files)",
            directive_path.display(),
            inputs.len()
        );
    } else {
        write_directive(&directive_path, preset, inputs, &outputs)?;
        info!(
            "Batch rendering {} files via {}",
            inputs.len(),
            directive_path.display()
        );
    }

    let cmd = ToolCommand::new("mastering", exe)
        .arg("--headless")
        .arg("--preset")
        .arg(preset)
        .arg("--batch")
        .arg_path(&directive_path);
    run_tool(&cmd, "batch render", &log_path, dry_run)?;

    if !dry_run {
        validate_batch_log(&log_path)?;
    }

    Ok(outputs)
}

fn write_directive(
    path: &Path,
    preset: &str,
    inputs: &[PathBuf],
    outputs: &[PathBuf],
) -> Result<()> {
    let mut lines = vec![format!("preset\t{preset}")];
    for (input, output) in inputs.iter().zip(outputs) {
        lines.push(format!("{}\t{}", input.display(), output.display()));
    }
    fs::write(path, lines.join("\n") + "\n").map_err(|e| PrepError::output_error(path, e))
}

/// The log must exist, carry the completion marker, and carry no failure
/// markers. Checked even when the tool exited 0.
pub fn validate_batch_log(log_path: &Path) -> Result<()> {
    let text = fs::read_to_string(log_path).map_err(|_| PrepError::BatchLogValidationFailure {
        path: log_path.to_path_buf(),
        reason: "log file missing or unreadable".to_string(),
    })?;

    for marker in BATCH_FAILURE_MARKERS {
        if text.contains(marker) {
            return Err(PrepError::BatchLogValidationFailure {
                path: log_path.to_path_buf(),
                reason: format!("failure marker '{marker}' present"),
            });
        }
    }

    if !text.contains(BATCH_COMPLETE_MARKER) {
        return Err(PrepError::BatchLogValidationFailure {
            path: log_path.to_path_buf(),
            reason: format!("completion marker '{BATCH_COMPLETE_MARKER}' not found"),
        });
    }

    Ok(())
}
