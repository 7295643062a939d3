//! Pipeline orchestration
//!
//! Drives one run end to end: parse the set list, scan for candidates, match,
//! then carry every matched track through the stage groups. Execution is
//! strictly sequential across tracks and stages: the mastering tool is
//! exclusive-use, and batch mode exists to amortize its per-invocation
//! startup cost, not to parallelize.

use crate::analysis::summary::{self, SummaryFormat};
use crate::config::{MatchMode, Settings, StopAfter};
use crate::discovery;
use crate::error::{PrepError, Result};
use crate::export::manifest::{ManifestRecord, ManifestWriter, TrackRecord};
use crate::export::playlist;
use crate::matching::{self, AutoResolver, MatchReport, MatchResolver, PromptResolver};
use crate::pipeline::track::{Stage, TrackState};
use crate::setlist;
use crate::tags;
use crate::tools::{analyze, master, transcode};
use crate::types::{SourceFile, TrackEntry};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Pipeline result summary
#[derive(Debug)]
pub struct PipelineResult {
    pub parsed_entries: usize,
    pub matched: usize,
    pub recorded: usize,
    pub unmatched_entries: usize,
    pub unmatched_files: usize,
}

/// Run the full preparation pipeline
pub fn run(settings: &Settings) -> Result<PipelineResult> {
    // Set list
    let set_file = setlist::find_set_file(&settings.target, settings.set_file.as_deref())?;
    info!("Using set list {}", set_file.display());
    let entries = setlist::parse_set_file(&set_file)?;
    info!("Parsed {} entries", entries.len());

    // Candidates
    let files = discovery::scan(&settings.source_dir)?;
    if files.is_empty() {
        return Err(PrepError::NoCandidates(settings.source_dir.clone()));
    }

    // Matching
    let report = match settings.match_mode {
        MatchMode::Scored => {
            let resolver: Box<dyn MatchResolver> = if settings.interactive {
                Box::new(PromptResolver)
            } else {
                Box::new(AutoResolver)
            };
            debug!("Scored matching with {} resolver", resolver.name());
            matching::score::match_entries(&entries, &files, resolver.as_ref())
        }
        MatchMode::Tags => matching::tagfirst::match_files(&entries, &files),
    };
    let MatchReport {
        mut matched,
        unmatched_entries,
        unmatched_files,
    } = report;

    if let Some(cap) = settings.max_tracks {
        if matched.len() > cap {
            info!("Capping run at {} of {} matched tracks", cap, matched.len());
            matched.truncate(cap);
        }
    }
    println!("Matched tracks: {} / {}", matched.len(), entries.len());

    let mut result = PipelineResult {
        parsed_entries: entries.len(),
        matched: matched.len(),
        recorded: 0,
        unmatched_entries: unmatched_entries.len(),
        unmatched_files: unmatched_files.len(),
    };

    if matched.is_empty() {
        report_unmatched(&unmatched_entries, &unmatched_files);
        return Ok(result);
    }

    if settings.confirm {
        confirm_or_abort(&format!("Process {} matched tracks?", matched.len()))?;
    }

    // Staging directories
    let converted_dir = settings.converted_dir();
    let mastered_dir = settings.mastered_dir();
    let covers_dir = settings.covers_dir();
    if !settings.dry_run {
        for dir in [&converted_dir, &mastered_dir] {
            std::fs::create_dir_all(dir).map_err(|e| PrepError::output_error(dir, e))?;
        }
    }

    // Group 1: extract tags + transcode
    let bar = stage_bar(settings, matched.len());
    let mut states: Vec<TrackState> = Vec::with_capacity(matched.len());
    for matched_track in matched {
        let mut state = TrackState::new(matched_track);
        state = extract_stage(state, &covers_dir, settings.dry_run)?;
        state = convert_stage(state, &converted_dir, settings)?;
        if let Some(bar) = &bar {
            bar.set_message(state.source.file_name());
            bar.inc(1);
        }
        states.push(state);
    }
    if let Some(bar) = bar {
        bar.finish_with_message("convert complete");
    }

    if settings.stop_after == Some(StopAfter::Convert) {
        info!("Stopping after convert stage");
        report_unmatched(&unmatched_entries, &unmatched_files);
        return Ok(result);
    }

    if settings.confirm {
        confirm_or_abort("Continue with mastering?")?;
    }

    // Group 2: render
    let states = render_group(states, &mastered_dir, settings)?;

    if settings.stop_after == Some(StopAfter::Render) {
        info!("Stopping after render stage");
        report_unmatched(&unmatched_entries, &unmatched_files);
        return Ok(result);
    }

    if settings.confirm {
        confirm_or_abort("Continue with analysis and tagging?")?;
    }

    // Group 3: analyze + tag + record
    let mut manifest = ManifestWriter::create(&settings.manifest_path(), settings.dry_run)?;
    let bar = stage_bar(settings, states.len());
    let mut final_paths: Vec<PathBuf> = Vec::with_capacity(states.len());
    for state in states {
        let state = analyze_stage(state, settings)?;
        let state = tag_stage(state, settings)?;
        let state = record_stage(state, &mut manifest)?;
        if let Some(path) = state.rendered.clone() {
            final_paths.push(path);
        }
        result.recorded += 1;
        if let Some(bar) = &bar {
            bar.set_message(state.source.file_name());
            bar.inc(1);
        }
    }
    if let Some(bar) = bar {
        bar.finish_with_message("analyze+tag complete");
    }

    for entry in &unmatched_entries {
        manifest.append(&ManifestRecord::unmatched_entry(entry))?;
    }
    for file in &unmatched_files {
        manifest.append(&ManifestRecord::unmatched_file(file))?;
    }
    manifest.finish()?;

    if let Some(script) = playlist::write_import_script(&settings.target, &final_paths, settings.dry_run)? {
        println!("Wrote import helper script: {}", script.display());
        println!("Run it after this flow to import the files and build the playlist.");
    }

    report_unmatched(&unmatched_entries, &unmatched_files);
    Ok(result)
}

/// Discovered -> TagsExtracted: snapshot embedded tags, side-copy cover art.
fn extract_stage(mut state: TrackState, covers_dir: &Path, dry_run: bool) -> Result<TrackState> {
    debug!("Extracting tags from {}", state.source.path.display());
    state.source_tags = tags::read_tag_map(&state.source.path);
    state.cover_art =
        tags::extract_cover_art(&state.source.path, &state.source.stem, covers_dir, dry_run);
    state.advance(Stage::TagsExtracted)?;
    Ok(state)
}

/// TagsExtracted -> Converted: transcode to the fixed-bit-depth intermediate.
fn convert_stage(mut state: TrackState, dir: &Path, settings: &Settings) -> Result<TrackState> {
    let output = transcode::convert(
        &settings.tools.transcoder_exe,
        &state.source.path,
        dir,
        &state.describe(),
        settings.dry_run,
    )?;
    state.converted = Some(output);
    state.advance(Stage::Converted)?;
    Ok(state)
}

/// Converted -> Rendered for the whole batch: per-file, batch, or passthrough.
fn render_group(
    mut states: Vec<TrackState>,
    dir: &Path,
    settings: &Settings,
) -> Result<Vec<TrackState>> {
    let bar = stage_bar(settings, states.len());

    if settings.batch_master && !settings.skip_master {
        let inputs: Vec<PathBuf> = states
            .iter()
            .map(|state| {
                state
                    .converted
                    .clone()
                    .ok_or_else(|| stage_gap(state, Stage::Converted))
            })
            .collect::<Result<_>>()?;
        let outputs = master::master_batch(
            &settings.tools.mastering_exe,
            &settings.tools.mastering_preset,
            &inputs,
            dir,
            settings.dry_run,
        )?;
        for (state, output) in states.iter_mut().zip(outputs) {
            state.rendered = Some(output);
            state.advance(Stage::Rendered)?;
            if let Some(bar) = &bar {
                bar.inc(1);
            }
        }
    } else {
        for state in &mut states {
            let input = state
                .converted
                .clone()
                .ok_or_else(|| stage_gap(state, Stage::Converted))?;
            let output = if settings.skip_master {
                master::passthrough(&input, dir, settings.dry_run)?
            } else {
                master::master_file(
                    &settings.tools.mastering_exe,
                    &settings.tools.mastering_preset,
                    &input,
                    dir,
                    &state.describe(),
                    settings.dry_run,
                )?
            };
            state.rendered = Some(output);
            state.advance(Stage::Rendered)?;
            if let Some(bar) = &bar {
                bar.set_message(state.source.file_name());
                bar.inc(1);
            }
        }
    }

    if let Some(bar) = bar {
        bar.finish_with_message("render complete");
    }
    Ok(states)
}

/// Rendered -> Analyzed: run the analyzer, condense its JSON into a summary.
fn analyze_stage(mut state: TrackState, settings: &Settings) -> Result<TrackState> {
    let rendered = state
        .rendered
        .clone()
        .ok_or_else(|| stage_gap(&state, Stage::Rendered))?;
    let json_path = analyze::analyze(
        &settings.tools.analyzer_exe,
        &rendered,
        &state.describe(),
        settings.dry_run,
    )?;
    let text = summary::summarize_file(&json_path, SummaryFormat::Compact);
    debug!("{}: {}", state.describe(), text);
    state.analysis_json = Some(json_path);
    state.summary = Some(text);
    state.advance(Stage::Analyzed)?;
    Ok(state)
}

/// Analyzed -> Tagged: write the final tag set onto the rendered file.
fn tag_stage(mut state: TrackState, settings: &Settings) -> Result<TrackState> {
    let rendered = state
        .rendered
        .clone()
        .ok_or_else(|| stage_gap(&state, Stage::Rendered))?;
    let summary_text = state
        .summary
        .clone()
        .unwrap_or_else(|| summary::MISSING_SENTINEL.to_string());
    state.final_tags = tags::apply_final_tags(
        &rendered,
        &state.entry,
        &state.source_tags,
        &summary_text,
        &settings.default_genre,
        state.cover_art.as_deref(),
        settings.dry_run,
    )?;
    state.advance(Stage::Tagged)?;
    Ok(state)
}

/// Tagged -> Recorded: append the manifest record.
fn record_stage(mut state: TrackState, manifest: &mut ManifestWriter) -> Result<TrackState> {
    let record = ManifestRecord::Track(TrackRecord::from_state(&state));
    manifest.append(&record)?;
    state.advance(Stage::Recorded)?;
    Ok(state)
}

fn stage_gap(state: &TrackState, needed: Stage) -> PrepError {
    PrepError::StageOrder {
        track: state.describe(),
        expected: needed.label().to_string(),
        actual: state.stage.label().to_string(),
    }
}

/// Blocking wait for operator input between stage groups.
fn confirm_or_abort(question: &str) -> Result<()> {
    print!("{question} [Y/n] ");
    io::stdout().flush().ok();
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let answer = line.trim().to_lowercase();
    if answer.is_empty() || answer == "y" || answer == "yes" {
        Ok(())
    } else {
        Err(PrepError::Aborted)
    }
}

fn stage_bar(settings: &Settings, len: usize) -> Option<ProgressBar> {
    if !settings.show_progress {
        return None;
    }
    let bar = ProgressBar::new(len as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    Some(bar)
}

fn report_unmatched(entries: &[TrackEntry], files: &[SourceFile]) {
    if !entries.is_empty() {
        println!();
        println!("Unmatched entries:");
        for entry in entries {
            println!("- {}", entry.describe());
        }
    }
    if !files.is_empty() {
        println!();
        println!("Files not matched to set entries:");
        for file in files {
            println!("- {}", file.file_name());
        }
    }
}
