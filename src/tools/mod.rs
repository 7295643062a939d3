//! External tool invocation
//!
//! Every audio transformation is delegated to an external executable invoked
//! as an argv command line. The core only interprets exit codes, captured
//! output, and declared output locations.

pub mod analyze;
pub mod master;
pub mod runner;
pub mod transcode;

pub use runner::{run_tool, ToolCommand};
