//! Filename heuristics: best-guess artist/title from a bare file name.
//!
//! Used when embedded tags don't provide a title. The only pattern
//! recognised is `Artist - Title`; anything else becomes the title.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::normalize::fold_ascii;
use crate::model::TrackMetadata;

/// Separator between artist and title.
pub const DELIMITER: &str = " - ";

/// `(...)` and `[...]` groups: remix/edition noise, never artist or title.
static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)|\[[^\]]*\]").expect("valid regex"));

/// Clean a file name: drop extension and bracketed noise, underscores to
/// spaces, trim, ASCII-fold.
pub fn clean_filename(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());

    let stripped = BRACKETED.replace_all(&stem, "");
    let spaced = stripped.replace('_', " ");

    fold_ascii(spaced.trim())
}

/// Derive metadata from a file name.
///
/// Only an exact two-part split on [`DELIMITER`] yields an artist.
/// `"A - B - C"` is kept whole as the title.
pub fn parse_filename(file_name: &str) -> TrackMetadata {
    let cleaned = clean_filename(file_name);

    let parts: Vec<&str> = cleaned.split(DELIMITER).map(str::trim).collect();
    if let [artist, title] = parts.as_slice()
        && !artist.is_empty()
        && !title.is_empty()
    {
        return TrackMetadata::new(Some(artist.to_string()), Some(title.to_string()));
    }

    TrackMetadata::new(None, Some(cleaned))
}
