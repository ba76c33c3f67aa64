//! Track metadata extraction.
//!
//! Uses the lofty crate for format-independent tag access, with a filename
//! fallback when tags are missing or unreadable.
//!
//! # Features
//! - Read embedded title/artist tags (MP3, FLAC, OGG, M4A, WAV)
//! - Parse `Artist - Title` file names
//! - Resolve one canonical artist/title pair per file

pub mod filename;
pub mod normalize;
pub mod resolver;

use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::Accessor;
use std::path::{Path, PathBuf};

use crate::model::TrackMetadata;

pub use filename::parse_filename;
pub use normalize::{fold_ascii, fold_key};
pub use resolver::{MetadataResolver, Resolution};

/// Why embedded tags could not be read.
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("Failed to open {path}: {message}")]
    Open { path: PathBuf, message: String },

    #[error("Failed to read tags from {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("No tag container in {0}")]
    NoTags(PathBuf),
}

/// Source of embedded tag data.
///
/// Production code uses [`LoftyTagReader`]; tests substitute fixed data.
pub trait TagReader {
    fn read_tags(&self, path: &Path) -> Result<TrackMetadata, TagError>;
}

/// Tag reader backed by lofty.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTagReader;

impl TagReader for LoftyTagReader {
    fn read_tags(&self, path: &Path) -> Result<TrackMetadata, TagError> {
        read(path)
    }
}

/// Read title and artist tags from an audio file.
///
/// Values are ASCII-folded; empty values are dropped.
pub fn read(path: &Path) -> Result<TrackMetadata, TagError> {
    let tagged_file = Probe::open(path)
        .map_err(|e| TagError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .read()
        .map_err(|e| TagError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    // Get the primary tag, or fall back to the first available tag
    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag())
        .ok_or_else(|| TagError::NoTags(path.to_path_buf()))?;

    let title = tag.title().map(|s| fold_ascii(&s));
    let artist = tag.artist().map(|s| fold_ascii(&s));

    Ok(TrackMetadata::new(artist, title))
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Minimal WAV fixtures for tag reading tests.

    use std::path::Path;

    /// Write a short silent 16-bit mono PCM WAV file.
    pub fn write_silent_wav(path: &Path) {
        let samples: u32 = 800;
        let data_len = samples * 2;
        let mut bytes = Vec::with_capacity(44 + data_len as usize);
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
        bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
        bytes.extend_from_slice(&8000u32.to_le_bytes());
        bytes.extend_from_slice(&16000u32.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.resize(44 + data_len as usize, 0);
        std::fs::write(path, bytes).expect("Failed to write wav fixture");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lofty::config::WriteOptions;
    use lofty::tag::{Tag, TagExt, TagType};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_non_audio_file_returns_error() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "This is just some text, not music.").expect("Failed to write to temp file");

        let result = read(file.path());

        assert!(result.is_err());
    }

    #[test]
    fn test_read_non_existent_file_returns_open_error() {
        let path = Path::new("non_existent_file.mp3");
        let result = read(path);
        assert!(matches!(result, Err(TagError::Open { .. })));
    }

    #[test]
    fn test_read_untagged_wav_has_no_title() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("silence.wav");
        test_support::write_silent_wav(&path);

        // Either no tag container or an empty one; never a title
        match read(&path) {
            Ok(meta) => assert!(!meta.has_title()),
            Err(e) => assert!(matches!(e, TagError::NoTags(_))),
        }
    }

    #[test]
    fn test_read_tagged_wav_folds_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tagged.wav");
        test_support::write_silent_wav(&path);

        let mut tag = Tag::new(TagType::RiffInfo);
        tag.set_title("Café del Mar".to_string());
        tag.set_artist("Energy 52".to_string());
        tag.save_to_path(&path, WriteOptions::default())
            .expect("Failed to write tags");

        let meta = LoftyTagReader.read_tags(&path).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Cafe del Mar"));
        assert_eq!(meta.artist.as_deref(), Some("Energy 52"));
    }
}
