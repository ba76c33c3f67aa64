//! Collection discovery: enumerate candidate audio files under a folder.

use std::path::Path;

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::model::AudioFile;

/// Extensions considered when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["mp3"];

/// Find audio files under `root` whose extension is in `extensions`
/// (case-insensitive, with or without a leading dot).
///
/// Non-recursive discovery only looks at the folder's immediate contents.
/// Entries are sorted by file name within each directory, so the order is
/// stable between runs. Unreadable entries are skipped with a warning.
pub fn discover(root: &Path, recursive: bool, extensions: &[String]) -> Result<Vec<AudioFile>> {
    if !root.is_dir() {
        return Err(Error::not_found(root));
    }

    let wanted: Vec<String> = extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(file) = AudioFile::from_path(entry.path()) else {
            continue;
        };
        if wanted.iter().any(|w| *w == file.extension) {
            files.push(file);
        }
    }

    tracing::debug!("Discovered {} candidate files under {:?}", files.len(), root);
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn names(files: &[AudioFile]) -> Vec<&str> {
        files.iter().map(|f| f.file_name.as_str()).collect()
    }

    fn mp3() -> Vec<String> {
        vec!["mp3".to_string()]
    }

    #[test]
    fn test_discover_immediate_contents_only() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        File::create(root.join("b.mp3")).unwrap();
        File::create(root.join("a.mp3")).unwrap();
        File::create(root.join("notes.txt")).unwrap(); // Should be ignored
        File::create(root.join("UPPERCASE.MP3")).unwrap(); // Case-insensitive

        let subdir = root.join("subdir");
        std::fs::create_dir(&subdir).unwrap();
        File::create(subdir.join("nested.mp3")).unwrap();

        let files = discover(root, false, &mp3()).unwrap();

        assert_eq!(names(&files), vec!["UPPERCASE.MP3", "a.mp3", "b.mp3"]);
    }

    #[test]
    fn test_discover_recursive() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        File::create(root.join("top.mp3")).unwrap();
        let subdir = root.join("album");
        std::fs::create_dir(&subdir).unwrap();
        File::create(subdir.join("01 - Intro.mp3")).unwrap();
        File::create(subdir.join("cover.jpg")).unwrap();

        let files = discover(root, true, &mp3()).unwrap();

        assert_eq!(names(&files), vec!["01 - Intro.mp3", "top.mp3"]);
        assert!(files.iter().all(|f| f.path.is_absolute()));
    }

    #[test]
    fn test_discover_configured_extensions() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        File::create(root.join("song.mp3")).unwrap();
        File::create(root.join("song.flac")).unwrap();
        File::create(root.join("song.ogg")).unwrap();

        let extensions = vec![".FLAC".to_string(), "ogg".to_string()];
        let files = discover(root, false, &extensions).unwrap();

        assert_eq!(names(&files), vec!["song.flac", "song.ogg"]);
    }

    #[test]
    fn test_discover_missing_root_is_error() {
        let dir = tempdir().unwrap();
        let result = discover(&dir.path().join("nope"), false, &mp3());
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_discover_file_root_is_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("song.mp3");
        File::create(&file).unwrap();
        assert!(discover(&file, false, &mp3()).is_err());
    }

    #[test]
    fn test_discover_empty_folder() {
        let dir = tempdir().unwrap();
        assert!(discover(dir.path(), true, &mp3()).unwrap().is_empty());
    }
}
