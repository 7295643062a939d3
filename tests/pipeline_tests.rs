//! Integration tests for the setprep pipeline
//!
//! These run the full flow in dry-run mode, where no external tools exist to
//! spawn and no files may be touched, and assert the pipeline still threads
//! every track through to a recorded manifest entry.

use setprep::config::{MatchMode, Settings, StopAfter, ToolPaths};
use setprep::pipeline;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_set_file(target: &Path, text: &str) {
    fs::write(target.join("set_raw.txt"), text).expect("Failed to write set file");
}

/// Two entries whose titles and artists appear in the source filenames below
const TWO_TRACK_SET: &str = "\
Raise
Azee Project
[Ministry 2024]

Strobe
deadmau5
[2005]
";

fn write_matching_sources(source: &Path) {
    fs::write(source.join("Azee_Project-Raise.mp3"), b"mp3").unwrap();
    fs::write(source.join("deadmau5 - Strobe.aiff"), b"aiff").unwrap();
}

fn dry_run_settings(target: &Path, source: &Path) -> Settings {
    Settings {
        target: target.to_path_buf(),
        set_file: None,
        source_dir: source.to_path_buf(),
        default_genre: "Electronic".to_string(),
        match_mode: MatchMode::Scored,
        interactive: false,
        max_tracks: None,
        skip_master: false,
        batch_master: false,
        confirm: false,
        stop_after: None,
        tools: ToolPaths {
            transcoder_exe: "ffmpeg".into(),
            mastering_exe: "rx-headless".into(),
            mastering_preset: "DJ Set Prep".to_string(),
            analyzer_exe: "streaming_extractor_music".into(),
        },
        dry_run: true,
        show_progress: false,
    }
}

#[test]
fn dry_run_records_every_matched_track() {
    let target = TempDir::new().unwrap();
    let source = TempDir::new().unwrap();
    write_set_file(target.path(), TWO_TRACK_SET);
    write_matching_sources(source.path());

    let settings = dry_run_settings(target.path(), source.path());
    let result = pipeline::run(&settings).expect("Dry run should succeed");

    assert_eq!(result.parsed_entries, 2);
    assert_eq!(result.matched, 2);
    assert_eq!(result.recorded, 2);
    assert_eq!(result.unmatched_entries, 0);
    assert_eq!(result.unmatched_files, 0);
}

#[test]
fn dry_run_mutates_nothing() {
    let target = TempDir::new().unwrap();
    let source = TempDir::new().unwrap();
    write_set_file(target.path(), TWO_TRACK_SET);
    write_matching_sources(source.path());

    let settings = dry_run_settings(target.path(), source.path());
    pipeline::run(&settings).expect("Dry run should succeed");

    // No staging dirs, no manifest, no helper script
    assert!(!settings.converted_dir().exists());
    assert!(!settings.mastered_dir().exists());
    assert!(!settings.covers_dir().exists());
    assert!(!settings.manifest_path().exists());
    assert!(!target.path().join("import_playlist.ps1").exists());

    // The target holds exactly what it started with
    let entries: Vec<_> = fs::read_dir(target.path()).unwrap().collect();
    assert_eq!(entries.len(), 1, "only the set file should remain");
}

#[test]
fn dry_run_reports_unmatched_entry() {
    let target = TempDir::new().unwrap();
    let source = TempDir::new().unwrap();
    let set_text = format!("{TWO_TRACK_SET}\nGhost Track\nNobody\n[1999]\n");
    write_set_file(target.path(), &set_text);
    write_matching_sources(source.path());

    let settings = dry_run_settings(target.path(), source.path());
    let result = pipeline::run(&settings).expect("Dry run should succeed");

    assert_eq!(result.parsed_entries, 3);
    assert_eq!(result.recorded, 2);
    assert_eq!(result.unmatched_entries, 1);
}

#[test]
fn dry_run_reports_unmatched_file() {
    let target = TempDir::new().unwrap();
    let source = TempDir::new().unwrap();
    write_set_file(target.path(), TWO_TRACK_SET);
    write_matching_sources(source.path());
    fs::write(source.path().join("leftover.flac"), b"flac").unwrap();

    let settings = dry_run_settings(target.path(), source.path());
    let result = pipeline::run(&settings).expect("Dry run should succeed");

    assert_eq!(result.recorded, 2);
    assert_eq!(result.unmatched_files, 1);
}

#[test]
fn max_tracks_caps_the_run() {
    let target = TempDir::new().unwrap();
    let source = TempDir::new().unwrap();
    write_set_file(target.path(), TWO_TRACK_SET);
    write_matching_sources(source.path());

    let mut settings = dry_run_settings(target.path(), source.path());
    settings.max_tracks = Some(1);
    let result = pipeline::run(&settings).expect("Dry run should succeed");

    assert_eq!(result.matched, 1);
    assert_eq!(result.recorded, 1);
}

#[test]
fn stop_after_convert_skips_recording() {
    let target = TempDir::new().unwrap();
    let source = TempDir::new().unwrap();
    write_set_file(target.path(), TWO_TRACK_SET);
    write_matching_sources(source.path());

    let mut settings = dry_run_settings(target.path(), source.path());
    settings.stop_after = Some(StopAfter::Convert);
    let result = pipeline::run(&settings).expect("Dry run should succeed");

    assert_eq!(result.matched, 2);
    assert_eq!(result.recorded, 0);
    assert!(!settings.manifest_path().exists());
}

#[test]
fn stop_after_render_skips_recording() {
    let target = TempDir::new().unwrap();
    let source = TempDir::new().unwrap();
    write_set_file(target.path(), TWO_TRACK_SET);
    write_matching_sources(source.path());

    let mut settings = dry_run_settings(target.path(), source.path());
    settings.stop_after = Some(StopAfter::Render);
    settings.skip_master = true;
    let result = pipeline::run(&settings).expect("Dry run should succeed");

    assert_eq!(result.recorded, 0);
}

#[test]
fn batch_master_dry_run_threads_every_track() {
    let target = TempDir::new().unwrap();
    let source = TempDir::new().unwrap();
    write_set_file(target.path(), TWO_TRACK_SET);
    write_matching_sources(source.path());

    let mut settings = dry_run_settings(target.path(), source.path());
    settings.batch_master = true;
    let result = pipeline::run(&settings).expect("Dry run should succeed");

    assert_eq!(result.recorded, 2);
    assert!(!settings.mastered_dir().exists());
}

#[test]
fn tag_first_mode_uses_sequential_fallback() {
    let target = TempDir::new().unwrap();
    let source = TempDir::new().unwrap();
    write_set_file(target.path(), TWO_TRACK_SET);
    // Untagged files whose names share nothing with the entries: only the
    // ordinal fallback can pair them.
    fs::write(source.path().join("01.mp3"), b"mp3").unwrap();
    fs::write(source.path().join("02.mp3"), b"mp3").unwrap();

    let mut settings = dry_run_settings(target.path(), source.path());
    settings.match_mode = MatchMode::Tags;
    let result = pipeline::run(&settings).expect("Dry run should succeed");

    assert_eq!(result.matched, 2);
    assert_eq!(result.recorded, 2);
}

#[test]
fn empty_source_dir_is_fatal() {
    let target = TempDir::new().unwrap();
    let source = TempDir::new().unwrap();
    write_set_file(target.path(), TWO_TRACK_SET);

    let settings = dry_run_settings(target.path(), source.path());
    assert!(pipeline::run(&settings).is_err());
}

#[test]
fn malformed_set_list_is_fatal() {
    let target = TempDir::new().unwrap();
    let source = TempDir::new().unwrap();
    write_set_file(target.path(), "Title Only\nArtist Only\n[2024]\nOrphan Line\n");
    write_matching_sources(source.path());

    let settings = dry_run_settings(target.path(), source.path());
    assert!(pipeline::run(&settings).is_err());
}

#[test]
fn missing_set_list_is_fatal() {
    let target = TempDir::new().unwrap();
    let source = TempDir::new().unwrap();
    write_matching_sources(source.path());

    let settings = dry_run_settings(target.path(), source.path());
    assert!(pipeline::run(&settings).is_err());
}

#[test]
fn missing_transcoder_aborts_before_render() {
    let target = TempDir::new().unwrap();
    let source = TempDir::new().unwrap();
    write_set_file(target.path(), TWO_TRACK_SET);
    write_matching_sources(source.path());

    let mut settings = dry_run_settings(target.path(), source.path());
    settings.dry_run = false;
    settings.skip_master = true;
    settings.stop_after = Some(StopAfter::Render);
    settings.tools.transcoder_exe = "setprep-test-no-such-binary".into();

    let result = pipeline::run(&settings);
    assert!(result.is_err(), "missing transcoder must abort the run");
    // Fail-fast: the mastered dir was created up front but nothing reached it
    assert_eq!(
        fs::read_dir(settings.mastered_dir())
            .map(|d| d.count())
            .unwrap_or(0),
        0
    );
}

#[test]
fn settings_validation_rejects_missing_dirs() {
    let target = TempDir::new().unwrap();
    let settings = dry_run_settings(target.path(), Path::new("/no/such/source/dir"));
    assert!(settings.validate().is_err());

    let source = TempDir::new().unwrap();
    let settings = dry_run_settings(Path::new("/no/such/target/dir"), source.path());
    assert!(settings.validate().is_err());
}
