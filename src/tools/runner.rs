//! Blocking subprocess runner
//!
//! Tools run synchronously, one at a time. The child is polled at a fixed
//! interval so long renders print elapsed-time heartbeats, and stdout/stderr
//! are redirected to a per-invocation log file whose tail is surfaced on
//! failure.

use crate::error::{PrepError, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_millis(500);
const HEARTBEAT_EVERY: Duration = Duration::from_secs(5);

/// Lines of tool output quoted in failure messages
const LOG_TAIL_LINES: usize = 8;

/// One external tool invocation
#[derive(Debug, Clone)]
pub struct ToolCommand {
    /// Short tool name for logs and errors ("transcoder", "mastering", ...)
    pub tool: &'static str,
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(tool: &'static str, program: &Path) -> Self {
        Self {
            tool,
            program: program.to_path_buf(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn arg_path(self, path: &Path) -> Self {
        self.arg(path.display().to_string())
    }

    /// Shell-style preview for logs and dry runs
    pub fn preview(&self) -> String {
        let mut parts = vec![quote(&self.program.display().to_string())];
        parts.extend(self.args.iter().map(|a| quote(a)));
        parts.join(" ")
    }
}

fn quote(arg: &str) -> String {
    if arg.contains(' ') {
        format!("\"{arg}\"")
    } else {
        arg.to_string()
    }
}

/// Run a tool to completion. `track` names the work item for heartbeats and
/// error messages. In dry-run mode the command line is printed and nothing is
/// spawned.
pub fn run_tool(cmd: &ToolCommand, track: &str, log_path: &Path, dry_run: bool) -> Result<()> {
    if dry_run {
        println!("[dry-run] {}: {}", cmd.tool, cmd.preview());
        return Ok(());
    }

    debug!("{}: {}", cmd.tool, cmd.preview());

    let log_file = File::create(log_path).map_err(|e| PrepError::output_error(log_path, e))?;
    let err_file = log_file
        .try_clone()
        .map_err(|e| PrepError::output_error(log_path, e))?;

    let mut child = Command::new(&cmd.program)
        .args(&cmd.args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(log_file))
        .stderr(Stdio::from(err_file))
        .spawn()
        .map_err(|e| {
            PrepError::subprocess_failure(cmd.tool, track, format!("failed to start: {e}"), "")
        })?;

    let started = Instant::now();
    let mut last_beat = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if last_beat.elapsed() >= HEARTBEAT_EVERY {
            info!(
                "{} still running on '{}' ({}s elapsed)",
                cmd.tool,
                track,
                started.elapsed().as_secs()
            );
            last_beat = Instant::now();
        }
        std::thread::sleep(POLL_INTERVAL);
    };

    if !status.success() {
        return Err(PrepError::subprocess_failure(
            cmd.tool,
            track,
            status_label(status),
            &log_tail(log_path),
        ));
    }

    debug!(
        "{} finished on '{}' in {:.1}s",
        cmd.tool,
        track,
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

fn status_label(status: std::process::ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Last few lines of a tool log, for error context
pub fn log_tail(log_path: &Path) -> String {
    match std::fs::read_to_string(log_path) {
        Ok(text) => {
            let mut lines: Vec<&str> = text.lines().rev().take(LOG_TAIL_LINES).collect();
            lines.reverse();
            lines.join("\n")
        }
        Err(_) => String::new(),
    }
}
