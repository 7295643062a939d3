//! Unified error types for setprep
//!
//! Error strategy:
//! - Pre-flight errors (set list, discovery, configuration): abort before any
//!   processing starts.
//! - Mid-run errors (external tool failures): abort the whole run. Downstream
//!   stages are expensive and a failed intermediate asset is not recoverable
//!   mid-batch, so there is no per-track skip-and-continue.
//! - Unmatched entries/files and missing analysis output are not errors; they
//!   are reported data.

use std::path::PathBuf;
use thiserror::Error;

/// Supported audio formats for helpful error messages
pub const SUPPORTED_FORMATS: &str = "MP3, WAV, FLAC, AIFF";

/// Top-level error type for setprep operations
#[derive(Debug, Error)]
pub enum PrepError {
    // =========================================================================
    // Pre-flight errors - abort before processing
    // =========================================================================
    #[error("Malformed set list '{path}': {reason}\n  Tip: the list must be title / artist / \"[label year]\" triplets")]
    MalformedInput { path: PathBuf, reason: String },

    #[error("No set list (.txt) found in '{0}'\n  Tip: pass --set-file to point at the list explicitly")]
    SetFileNotFound(PathBuf),

    #[error("No usable audio files found in '{0}'\n  Supported formats: {SUPPORTED_FORMATS}")]
    NoCandidates(PathBuf),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    // =========================================================================
    // Mid-run errors - abort the whole run
    // =========================================================================
    #[error("{tool} failed for '{track}': {status}{detail}")]
    SubprocessFailure {
        tool: String,
        track: String,
        status: String,
        detail: String,
    },

    #[error("Batch render log '{path}' failed validation: {reason}")]
    BatchLogValidationFailure { path: PathBuf, reason: String },

    #[error("Pipeline stage out of order for '{track}': needed {expected}, currently {actual}")]
    StageOrder {
        track: String,
        expected: String,
        actual: String,
    },

    #[error("Cannot write tags to '{path}': {reason}")]
    TagWrite { path: PathBuf, reason: String },

    #[error("Cannot write output to '{path}': {reason}")]
    OutputError { path: PathBuf, reason: String },

    #[error("Aborted by operator")]
    Aborted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for setprep operations
pub type Result<T> = std::result::Result<T, PrepError>;

impl PrepError {
    /// Create a malformed-input error for a set list
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        PrepError::MalformedInput {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a subprocess failure, attaching the tail of the tool log when present
    pub fn subprocess_failure(
        tool: impl Into<String>,
        track: impl Into<String>,
        status: impl Into<String>,
        log_tail: &str,
    ) -> Self {
        let detail = if log_tail.trim().is_empty() {
            String::new()
        } else {
            let indented: Vec<String> = log_tail.lines().map(|l| format!("    {l}")).collect();
            format!("\n  last output:\n{}", indented.join("\n"))
        };
        PrepError::SubprocessFailure {
            tool: tool.into(),
            track: track.into(),
            status: status.into(),
            detail,
        }
    }

    /// Create an output error, checking for common issues
    pub fn output_error(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        let reason = match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                format!(
                    "Permission denied. Check that you have write access to {}",
                    path.display()
                )
            }
            std::io::ErrorKind::NotFound => {
                format!(
                    "Directory does not exist: {}",
                    path.parent()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default()
                )
            }
            _ => err.to_string(),
        };
        PrepError::OutputError { path, reason }
    }
}
