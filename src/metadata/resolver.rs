//! Metadata resolution: embedded tags first, file name second.

use tracing::debug;

use super::{TagReader, filename};
use crate::model::{AudioFile, MetadataSource, TrackMetadata};

/// Outcome of resolving one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A title was found
    Identified {
        metadata: TrackMetadata,
        source: MetadataSource,
    },
    /// Neither tags nor the file name produced a title
    NoTitle,
}

/// Produces one canonical artist/title pair per file.
pub struct MetadataResolver<R: TagReader> {
    tags: R,
}

impl<R: TagReader> MetadataResolver<R> {
    pub fn new(tags: R) -> Self {
        Self { tags }
    }

    /// Resolve metadata for a file.
    ///
    /// Tags win when they carry a title. Otherwise the file name result
    /// replaces the tag data entirely, even a tag artist.
    pub fn resolve(&self, file: &AudioFile) -> Resolution {
        match self.tags.read_tags(file.path()) {
            Ok(metadata) if metadata.has_title() => {
                return Resolution::Identified {
                    metadata,
                    source: MetadataSource::Tags,
                };
            }
            Ok(_) => debug!("No title tag in {}", file.file_name),
            Err(e) => debug!("Tag read failed, using file name: {}", e),
        }

        let metadata = filename::parse_filename(&file.file_name);
        if metadata.has_title() {
            Resolution::Identified {
                metadata,
                source: MetadataSource::Filename,
            }
        } else {
            Resolution::NoTitle
        }
    }
}
