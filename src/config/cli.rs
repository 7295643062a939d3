//! CLI argument parsing and configuration

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// setprep - DJ set preparation pipeline
///
/// Matches a curated set list against a folder of source audio files, then
/// drives each matched track through transcode, mastering, acoustic analysis,
/// and tagging, writing a newline-delimited JSON manifest at the end.
#[derive(Parser, Debug)]
#[command(name = "setprep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Target set folder (holds the set list, staging dirs, and outputs)
    #[arg(value_name = "TARGET_DIR")]
    pub target: PathBuf,

    /// Explicit set list file (defaults to *raw*.txt or the first .txt in the target folder)
    #[arg(long, value_name = "FILE")]
    pub set_file: Option<PathBuf>,

    /// Root folder containing source audio files (searched recursively)
    #[arg(short, long, value_name = "DIR")]
    pub source_dir: PathBuf,

    /// Genre written when the source file carries none
    #[arg(long, default_value = "Electronic", value_name = "GENRE")]
    pub default_genre: String,

    /// Entry-to-file matching strategy
    #[arg(long, value_enum, default_value = "scored")]
    pub match_mode: MatchMode,

    /// Accept the top candidate for uncertain matches instead of prompting
    #[arg(long, default_value = "false")]
    pub non_interactive: bool,

    /// Cap on matched tracks to process (e.g. 1 for a smoke test)
    #[arg(long, value_name = "N")]
    pub max_tracks: Option<usize>,

    /// Replace the mastering stage with a byte-for-byte copy
    #[arg(long, default_value = "false")]
    pub skip_master: bool,

    /// Master all converted files in one batch invocation instead of per file
    #[arg(long, default_value = "false")]
    pub batch_master: bool,

    /// Pause for operator confirmation between stage groups
    #[arg(long, default_value = "false")]
    pub confirm: bool,

    /// Stop the run after the named stage
    #[arg(long, value_enum, value_name = "STAGE")]
    pub stop_after: Option<StopAfter>,

    /// Transcoder executable
    #[arg(long, default_value = "ffmpeg", value_name = "EXE")]
    pub transcoder_exe: PathBuf,

    /// Mastering processor executable
    #[arg(long, default_value = "rx-headless", value_name = "EXE")]
    pub mastering_exe: PathBuf,

    /// Mastering preset name
    #[arg(long, default_value = "DJ Set Prep", value_name = "PRESET")]
    pub mastering_preset: String,

    /// Acoustic analyzer executable
    #[arg(long, default_value = "streaming_extractor_music", value_name = "EXE")]
    pub analyzer_exe: PathBuf,

    /// Preview every action without spawning tools or touching files
    #[arg(long, default_value = "false")]
    pub dry_run: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress progress bars)
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

/// Which matching strategy pairs entries with files
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatchMode {
    /// Score candidates by title/artist substrings of the filename stem
    Scored,
    /// Trust embedded tags first, ordinal position second; never prompts
    Tags,
}

/// Stages the run can be configured to stop after
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StopAfter {
    Convert,
    Render,
}
