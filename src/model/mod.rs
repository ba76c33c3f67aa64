//! Core data models for the matching pipeline.
//!
//! Defines the entities that flow from the collection walker through
//! metadata resolution and catalog matching: [`AudioFile`],
//! [`TrackMetadata`], [`MatchResult`], and [`PlaylistTarget`].

use std::path::{Path, PathBuf};

use crate::catalog::{CatalogError, CatalogTrack, MatchTier};

/// A candidate audio file discovered on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    /// Absolute path (identity)
    pub path: PathBuf,
    /// Raw file name including extension
    pub file_name: String,
    /// Lowercased extension without the dot
    pub extension: String,
}

impl AudioFile {
    /// Build from a path. Returns None if the path has no file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let path = std::path::absolute(&path).unwrap_or(path);
        let file_name = path.file_name()?.to_string_lossy().into_owned();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        Some(Self {
            path,
            file_name,
            extension,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Artist/title pair used for catalog matching.
///
/// Empty strings are never stored: constructors turn them into `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub artist: Option<String>,
    pub title: Option<String>,
}

impl TrackMetadata {
    /// Create metadata, trimming values and dropping empty ones.
    pub fn new(artist: Option<String>, title: Option<String>) -> Self {
        Self {
            artist: non_empty(artist),
            title: non_empty(title),
        }
    }

    /// Whether this metadata can be used for a catalog search.
    pub fn has_title(&self) -> bool {
        self.title.is_some()
    }

    /// Artist for display purposes.
    pub fn artist_or_unknown(&self) -> &str {
        self.artist.as_deref().unwrap_or("Unknown")
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Where resolved metadata came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataSource {
    Tags,
    Filename,
}

/// What happened to a single file in the pipeline.
#[derive(Debug, Clone)]
pub enum FileOutcome {
    /// A catalog track was found
    Matched {
        track: CatalogTrack,
        tier: MatchTier,
        source: MetadataSource,
    },
    /// Neither tags nor the file name produced a title
    NoTitle,
    /// Every search tier came back empty
    NotFound {
        metadata: TrackMetadata,
        source: MetadataSource,
    },
    /// Every attempted tier failed, so the catalog never answered
    SearchFailed {
        metadata: TrackMetadata,
        source: MetadataSource,
        errors: Vec<(MatchTier, CatalogError)>,
    },
}

/// One per processed [`AudioFile`].
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub file: AudioFile,
    pub outcome: FileOutcome,
}

impl MatchResult {
    /// Matched catalog track identifier, if any.
    pub fn track_id(&self) -> Option<&str> {
        self.track().map(|t| t.id.as_str())
    }

    pub fn track(&self) -> Option<&CatalogTrack> {
        match &self.outcome {
            FileOutcome::Matched { track, .. } => Some(track),
            _ => None,
        }
    }
}

/// A resolved playlist on the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistTarget {
    pub name: String,
    /// Remote identifier
    pub id: String,
    /// Whether the playlist was created during this run
    pub created: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_file_from_path() {
        let file = AudioFile::from_path("/music/Artist - Song.MP3").unwrap();
        assert_eq!(file.file_name, "Artist - Song.MP3");
        assert_eq!(file.extension, "mp3");
        assert!(file.path.is_absolute());
    }

    #[test]
    fn test_audio_file_relative_path_becomes_absolute() {
        let file = AudioFile::from_path("song.mp3").unwrap();
        assert!(file.path().is_absolute());
        assert_eq!(file.file_name, "song.mp3");
    }

    #[test]
    fn test_track_metadata_drops_empty_values() {
        let meta = TrackMetadata::new(Some("   ".to_string()), Some(" Title ".to_string()));
        assert_eq!(meta.artist, None);
        assert_eq!(meta.title.as_deref(), Some("Title"));
        assert!(meta.has_title());
        assert_eq!(meta.artist_or_unknown(), "Unknown");
    }
}
