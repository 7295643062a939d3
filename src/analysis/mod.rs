//! Acoustic-analysis interpretation
//!
//! The pipeline never analyzes audio itself; it reads the external analyzer's
//! JSON output and condenses it into a short tag string.

pub mod summary;
pub mod wheel;

pub use summary::{summarize, summarize_file, SummaryFormat, MISSING_SENTINEL};
pub use wheel::wheel_slot;
