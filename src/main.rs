//! setprep CLI entry point

use clap::Parser;
use setprep::config::{Cli, Settings};
use setprep::pipeline;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli);

    // Build settings from CLI and validate once, up front
    let settings = Settings::from_cli(&cli);
    if let Err(e) = settings.validate() {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    // Run the pipeline
    match pipeline::run(&settings) {
        Ok(result) => {
            println!();
            println!(
                "Summary: {} recorded, {} unmatched entries, {} unmatched files (of {} parsed)",
                result.recorded,
                result.unmatched_entries,
                result.unmatched_files,
                result.parsed_entries
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Fatal error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = if cli.quiet { "error" } else { filter };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}
