//! setprep - DJ Set Preparation Pipeline
//!
//! A command-line utility that matches a curated set list against a folder
//! of source audio files, then carries each matched track through a staged
//! pipeline of external tool invocations: transcode, optional mastering,
//! acoustic analysis, and tagging. The run ends with a newline-delimited
//! JSON manifest of everything that happened.
//!
//! # Architecture
//!
//! The library is organized into several key modules:
//!
//! - `config`: CLI argument parsing and runtime settings
//! - `setlist`: track-list parsing (title/artist/"[label year]" triplets)
//! - `discovery`: source-file scanning
//! - `matching`: entry-to-file matching strategies and resolvers
//! - `analysis`: Camelot wheel table and analysis-summary codec
//! - `tags`: tag container access and title composition
//! - `tools`: external tool invocation (transcoder, mastering, analyzer)
//! - `pipeline`: per-track state machine and orchestration
//! - `export`: manifest and import-script output
//!
//! # Example
//!
//! ```no_run
//! use setprep::config::Settings;
//! use setprep::pipeline;
//!
//! # fn demo(settings: Settings) {
//! let result = pipeline::run(&settings).expect("run failed");
//! println!("Recorded {} tracks", result.recorded);
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod discovery;
pub mod error;
pub mod export;
pub mod matching;
pub mod pipeline;
pub mod setlist;
pub mod tags;
pub mod tools;
pub mod types;

// Re-export key types at crate root
pub use error::{PrepError, Result};
pub use types::{MatchBasis, MatchedTrack, SourceFile, TrackEntry};
