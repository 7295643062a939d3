//! Run outputs: the processed-metadata manifest and the import helper script

pub mod manifest;
pub mod playlist;

pub use manifest::{ManifestRecord, ManifestWriter, TrackRecord};
