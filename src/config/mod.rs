//! Configuration: CLI surface and runtime settings

pub mod cli;
pub mod settings;

pub use cli::{Cli, MatchMode, StopAfter};
pub use settings::{Settings, ToolPaths};
