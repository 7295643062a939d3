//! Tag container access
//!
//! Reads and writes the fixed field set the pipeline cares about through
//! lofty, which handles ID3v2 (MP3/AIFF), Vorbis comments (FLAC), and RIFF
//! INFO (WAV) uniformly. Reading degrades to an empty snapshot on unreadable
//! files; writing failures are fatal.

use crate::error::{PrepError, Result};
use crate::types::{TagMap, TrackEntry};
use lofty::{Accessor, ItemKey, MimeType, Picture, PictureType, Probe, Tag, TagExt, TaggedFileExt};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const FIELD_TITLE: &str = "title";
pub const FIELD_ARTIST: &str = "artist";
pub const FIELD_ALBUM_ARTIST: &str = "album_artist";
pub const FIELD_ALBUM: &str = "album";
pub const FIELD_GENRE: &str = "genre";
pub const FIELD_YEAR: &str = "year";
pub const FIELD_COMMENT: &str = "comment";

/// Album written when the source carries none
const ALBUM_DEFAULT: &str = "DJ Set Prep";

/// Snapshot the fixed field set from a file's primary tag.
///
/// Unreadable or untagged files yield an empty snapshot; the pipeline treats
/// missing tags as "nothing embedded", not as an error.
pub fn read_tag_map(path: &Path) -> TagMap {
    match read_primary_tag(path) {
        Ok(Some(tag)) => tag_to_map(&tag),
        Ok(None) => {
            debug!("No tags found in {}", path.display());
            TagMap::new()
        }
        Err(e) => {
            warn!("Failed to read tags from {}: {}", path.display(), e);
            TagMap::new()
        }
    }
}

fn read_primary_tag(path: &Path) -> std::result::Result<Option<Tag>, lofty::error::LoftyError> {
    let tagged_file = Probe::open(path)?.read()?;
    Ok(tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag())
        .cloned())
}

fn tag_to_map(tag: &Tag) -> TagMap {
    let mut map = TagMap::new();
    insert_value(&mut map, FIELD_TITLE, tag.title().map(|s| s.to_string()));
    insert_value(&mut map, FIELD_ARTIST, tag.artist().map(|s| s.to_string()));
    insert_value(
        &mut map,
        FIELD_ALBUM_ARTIST,
        tag.get_string(&ItemKey::AlbumArtist).map(str::to_string),
    );
    insert_value(&mut map, FIELD_ALBUM, tag.album().map(|s| s.to_string()));
    insert_value(&mut map, FIELD_GENRE, tag.genre().map(|s| s.to_string()));
    insert_value(&mut map, FIELD_YEAR, tag.year().map(|y| y.to_string()));
    insert_value(&mut map, FIELD_COMMENT, tag.comment().map(|s| s.to_string()));
    map
}

fn insert_value(map: &mut TagMap, field: &str, value: Option<String>) {
    if let Some(value) = value {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            map.insert(field.to_string(), vec![trimmed.to_string()]);
        }
    }
}

/// First value of a field in a snapshot
pub fn first_value<'a>(map: &'a TagMap, field: &str) -> Option<&'a str> {
    map.get(field)
        .and_then(|values| values.first())
        .map(String::as_str)
}

/// Extract the first embedded picture into `art_dir` as a byte copy.
///
/// Absence of art (or an unreadable file) is a no-op. In dry-run mode the
/// destination path is still computed and returned when art exists, without
/// writing anything.
pub fn extract_cover_art(path: &Path, stem: &str, art_dir: &Path, dry_run: bool) -> Option<PathBuf> {
    let tagged_file = Probe::open(path).ok()?.read().ok()?;
    let tag = tagged_file.primary_tag().or_else(|| tagged_file.first_tag())?;
    let picture = tag.pictures().first()?;
    let data = picture.data().to_vec();

    let dest = art_dir.join(format!("{stem}.{}", sniff_image_ext(&data)));
    if dry_run {
        debug!("Would extract cover art to {}", dest.display());
        return Some(dest);
    }

    if let Err(e) = fs::create_dir_all(art_dir).and_then(|_| fs::write(&dest, &data)) {
        warn!("Could not extract cover art from {}: {}", path.display(), e);
        return None;
    }
    debug!("Extracted cover art to {}", dest.display());
    Some(dest)
}

fn sniff_image_ext(data: &[u8]) -> &'static str {
    if data.starts_with(b"\x89PNG") {
        "png"
    } else {
        "jpg"
    }
}

fn mime_for(data: &[u8]) -> MimeType {
    if data.starts_with(b"\x89PNG") {
        MimeType::Png
    } else {
        MimeType::Jpeg
    }
}

/// Compose the final title, appending the entry's "[label year]" suffix only
/// when the base title does not already end with it (case-insensitive), so
/// repeated runs never stack suffixes.
pub fn compose_title(existing: Option<&str>, entry: &TrackEntry, fallback_stem: &str) -> String {
    let base = existing
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| Some(entry.title.trim()).filter(|s| !s.is_empty()))
        .unwrap_or(fallback_stem);

    let suffix = match (&entry.label, &entry.year) {
        (Some(label), Some(year)) => format!(" [{label} {year}]"),
        (Some(label), None) => format!(" [{label}]"),
        (None, Some(year)) => format!(" [{year}]"),
        (None, None) => String::new(),
    };

    if !suffix.is_empty() && !base.to_lowercase().ends_with(&suffix.to_lowercase()) {
        format!("{base}{suffix}").trim().to_string()
    } else {
        base.to_string()
    }
}

/// Write the final tag set onto a rendered file.
///
/// Precedence per field: value already embedded in the source, then the
/// matched entry, then the configured default. Returns the snapshot that was
/// (or in dry-run, would be) written.
#[allow(clippy::too_many_arguments)]
pub fn apply_final_tags(
    path: &Path,
    entry: &TrackEntry,
    source_tags: &TagMap,
    summary: &str,
    default_genre: &str,
    cover_art: Option<&Path>,
    dry_run: bool,
) -> Result<TagMap> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    let title = compose_title(first_value(source_tags, FIELD_TITLE), entry, &stem);
    let artist = first_value(source_tags, FIELD_ARTIST)
        .unwrap_or(&entry.artist)
        .to_string();
    let album_artist = artist.clone();
    let album = first_value(source_tags, FIELD_ALBUM)
        .unwrap_or(ALBUM_DEFAULT)
        .to_string();
    let genre = first_value(source_tags, FIELD_GENRE)
        .unwrap_or(default_genre)
        .to_string();
    let year = first_value(source_tags, FIELD_YEAR)
        .map(str::to_string)
        .or_else(|| entry.year.clone());

    let mut final_tags = TagMap::new();
    insert_value(&mut final_tags, FIELD_TITLE, Some(title.clone()));
    insert_value(&mut final_tags, FIELD_ARTIST, Some(artist.clone()));
    insert_value(&mut final_tags, FIELD_ALBUM_ARTIST, Some(album_artist.clone()));
    insert_value(&mut final_tags, FIELD_ALBUM, Some(album.clone()));
    insert_value(&mut final_tags, FIELD_GENRE, Some(genre.clone()));
    insert_value(&mut final_tags, FIELD_YEAR, year.clone());
    insert_value(&mut final_tags, FIELD_COMMENT, Some(summary.to_string()));

    if dry_run {
        println!(
            "[dry-run] would tag {}: title='{}', artist='{}'",
            path.file_name().and_then(|n| n.to_str()).unwrap_or("?"),
            title,
            artist
        );
        return Ok(final_tags);
    }

    let tag_write_err = |reason: String| PrepError::TagWrite {
        path: path.to_path_buf(),
        reason,
    };

    let tagged_file = Probe::open(path)
        .and_then(|probe| probe.read())
        .map_err(|e| tag_write_err(e.to_string()))?;
    let mut tag = tagged_file
        .primary_tag()
        .cloned()
        .unwrap_or_else(|| Tag::new(tagged_file.primary_tag_type()));

    tag.set_title(title);
    tag.set_artist(artist);
    tag.insert_text(ItemKey::AlbumArtist, album_artist);
    tag.set_album(album);
    tag.set_genre(genre);
    if let Some(year) = year.as_deref().and_then(|y| y.parse::<u32>().ok()) {
        tag.set_year(year);
    }
    tag.set_comment(summary.to_string());

    if let Some(art_path) = cover_art {
        if tag.pictures().is_empty() {
            match fs::read(art_path) {
                Ok(data) => {
                    let mime = mime_for(&data);
                    tag.push_picture(Picture::new_unchecked(
                        PictureType::CoverFront,
                        Some(mime),
                        None,
                        data,
                    ));
                }
                Err(e) => warn!("Could not re-embed cover art {}: {}", art_path.display(), e),
            }
        }
    }

    tag.save_to_path(path)
        .map_err(|e| tag_write_err(e.to_string()))?;

    debug!("Tagged {}", path.display());
    Ok(final_tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(label: Option<&str>, year: Option<&str>) -> TrackEntry {
        TrackEntry {
            title: "Raise".to_string(),
            artist: "Azee Project".to_string(),
            label: label.map(str::to_string),
            year: year.map(str::to_string),
        }
    }

    #[test]
    fn title_suffix_from_label_and_year() {
        let composed = compose_title(None, &entry(Some("Ministry"), Some("2024")), "stem");
        assert_eq!(composed, "Raise [Ministry 2024]");
    }

    #[test]
    fn title_suffix_label_only_and_year_only() {
        assert_eq!(
            compose_title(None, &entry(Some("Ministry"), None), "stem"),
            "Raise [Ministry]"
        );
        assert_eq!(
            compose_title(None, &entry(None, Some("2024")), "stem"),
            "Raise [2024]"
        );
        assert_eq!(compose_title(None, &entry(None, None), "stem"), "Raise");
    }

    #[test]
    fn existing_title_wins_over_entry() {
        let composed = compose_title(
            Some("Raise (Extended Mix)"),
            &entry(Some("Ministry"), Some("2024")),
            "stem",
        );
        assert_eq!(composed, "Raise (Extended Mix) [Ministry 2024]");
    }

    #[test]
    fn suffix_is_idempotent() {
        let e = entry(Some("Ministry"), Some("2024"));
        let first = compose_title(None, &e, "stem");
        let second = compose_title(Some(&first), &e, "stem");
        assert_eq!(first, second);
        // Case changes do not defeat the check
        let third = compose_title(Some("Raise [ministry 2024]"), &e, "stem");
        assert_eq!(third, "Raise [ministry 2024]");
    }

    #[test]
    fn falls_back_to_stem_when_no_titles() {
        let mut e = entry(None, None);
        e.title = String::new();
        assert_eq!(compose_title(None, &e, "Some_File"), "Some_File");
    }

    #[test]
    fn image_extension_sniffing() {
        assert_eq!(sniff_image_ext(b"\x89PNG\r\n\x1a\n...."), "png");
        assert_eq!(sniff_image_ext(b"\xff\xd8\xff\xe0...."), "jpg");
    }

    #[test]
    fn first_value_reads_snapshot() {
        let mut map = TagMap::new();
        map.insert(FIELD_TITLE.to_string(), vec!["Raise".to_string()]);
        assert_eq!(first_value(&map, FIELD_TITLE), Some("Raise"));
        assert_eq!(first_value(&map, FIELD_ARTIST), None);
    }
}
