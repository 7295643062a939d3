//! Runtime configuration settings
//!
//! Everything the pipeline needs, including external executable locations,
//! lives here and is validated once at startup. Nothing reads ambient state.

use crate::config::cli::{Cli, MatchMode, StopAfter};
use crate::error::{PrepError, Result};
use std::path::PathBuf;

/// External tool locations and parameters
#[derive(Debug, Clone)]
pub struct ToolPaths {
    pub transcoder_exe: PathBuf,
    pub mastering_exe: PathBuf,
    pub mastering_preset: String,
    pub analyzer_exe: PathBuf,
}

/// Runtime settings for one pipeline run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Target set folder
    pub target: PathBuf,
    /// Explicit set list file, if given
    pub set_file: Option<PathBuf>,
    /// Source audio library root
    pub source_dir: PathBuf,
    /// Genre written when the source carries none
    pub default_genre: String,
    /// Matching strategy
    pub match_mode: MatchMode,
    /// Prompt the operator for uncertain matches
    pub interactive: bool,
    /// Cap on matched tracks to process
    pub max_tracks: Option<usize>,
    /// Replace mastering with a byte-for-byte copy
    pub skip_master: bool,
    /// One batch mastering invocation instead of per file
    pub batch_master: bool,
    /// Pause between stage groups
    pub confirm: bool,
    /// Stop the run after this stage
    pub stop_after: Option<StopAfter>,
    /// External tool locations
    pub tools: ToolPaths,
    /// Preview mode: no subprocesses, no file mutations
    pub dry_run: bool,
    /// Show progress bars
    pub show_progress: bool,
}

impl Settings {
    /// Create settings from CLI arguments
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            target: cli.target.clone(),
            set_file: cli.set_file.clone(),
            source_dir: cli.source_dir.clone(),
            default_genre: cli.default_genre.clone(),
            match_mode: cli.match_mode,
            interactive: !cli.non_interactive,
            // A zero cap means no cap
            max_tracks: cli.max_tracks.filter(|n| *n > 0),
            skip_master: cli.skip_master,
            batch_master: cli.batch_master,
            confirm: cli.confirm,
            stop_after: cli.stop_after,
            tools: ToolPaths {
                transcoder_exe: cli.transcoder_exe.clone(),
                mastering_exe: cli.mastering_exe.clone(),
                mastering_preset: cli.mastering_preset.clone(),
                analyzer_exe: cli.analyzer_exe.clone(),
            },
            dry_run: cli.dry_run,
            show_progress: !cli.quiet,
        }
    }

    /// Validate the configuration before any processing starts
    pub fn validate(&self) -> Result<()> {
        if !self.target.is_dir() {
            return Err(PrepError::ConfigError(format!(
                "target folder does not exist: {}",
                self.target.display()
            )));
        }
        if !self.source_dir.is_dir() {
            return Err(PrepError::ConfigError(format!(
                "source folder does not exist: {}",
                self.source_dir.display()
            )));
        }
        if let Some(set_file) = &self.set_file {
            if !set_file.is_file() {
                return Err(PrepError::ConfigError(format!(
                    "set list file does not exist: {}",
                    set_file.display()
                )));
            }
        }
        if self.tools.mastering_preset.trim().is_empty() {
            return Err(PrepError::ConfigError(
                "mastering preset must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Staging directory for transcoded intermediates
    pub fn converted_dir(&self) -> PathBuf {
        self.target.join("converted")
    }

    /// Staging directory for mastered/rendered files
    pub fn mastered_dir(&self) -> PathBuf {
        self.target.join("mastered")
    }

    /// Side-channel directory for extracted cover art
    pub fn covers_dir(&self) -> PathBuf {
        self.target.join("covers")
    }

    /// Final manifest location
    pub fn manifest_path(&self) -> PathBuf {
        self.target.join(crate::export::manifest::MANIFEST_FILE_NAME)
    }
}
