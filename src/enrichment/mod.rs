//! Enrichment report: matched tracks plus artist follower counts, as JSON.
//!
//! Built after publishing, from the walk report. Each distinct primary
//! artist is looked up once; a failed lookup leaves its count empty.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::ArtistApi;
use crate::error::{Result, ResultExt};
use crate::model::MatchResult;

/// One matched file with catalog details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    pub file: PathBuf,
    pub track_id: String,
    pub uri: String,
    pub name: String,
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub duration_ms: Option<u64>,
    pub popularity: Option<u32>,
    pub external_url: Option<String>,
    pub primary_artist_id: Option<String>,
    pub primary_artist_followers: Option<u64>,
}

/// Build records for every matched result, in order.
pub async fn build_records<'r, A, I>(api: &A, results: I) -> Vec<EnrichmentRecord>
where
    A: ArtistApi,
    I: IntoIterator<Item = &'r MatchResult>,
{
    let mut followers: HashMap<String, Option<u64>> = HashMap::new();
    let mut records = Vec::new();

    for result in results {
        let Some(track) = result.track() else {
            continue;
        };

        let primary_artist_id = track.primary_artist().and_then(|a| a.id.clone());
        let primary_artist_followers = match &primary_artist_id {
            Some(id) => match followers.get(id) {
                Some(count) => *count,
                None => {
                    let count = match api.artist(id).await {
                        Ok(profile) => Some(profile.followers),
                        Err(e) => {
                            warn!("Artist lookup failed for {}: {}", id, e);
                            None
                        }
                    };
                    followers.insert(id.clone(), count);
                    count
                }
            },
            None => None,
        };

        records.push(EnrichmentRecord {
            file: result.file.path.clone(),
            track_id: track.id.clone(),
            uri: track.uri.clone(),
            name: track.name.clone(),
            artists: track.artists.iter().map(|a| a.name.clone()).collect(),
            album: track.album.clone(),
            duration_ms: track.duration.map(|d| d.as_millis() as u64),
            popularity: track.popularity,
            external_url: track.external_url.clone(),
            primary_artist_id,
            primary_artist_followers,
        });
    }

    debug!(
        "Built {} enrichment records ({} artist lookups)",
        records.len(),
        followers.len()
    );
    records
}

/// Write records as a pretty JSON array (temp file, then rename).
pub fn write_records(path: &Path, records: &[EnrichmentRecord]) -> Result<()> {
    let contents = serde_json::to_string_pretty(records)
        .map_err(std::io::Error::other)
        .with_context("Failed to serialize enrichment records")?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(format!("Failed to create {:?}", dir))?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    std::fs::write(&temp_path, contents)
        .with_context(format!("Failed to write {:?}", temp_path))?;
    std::fs::rename(&temp_path, path)
        .with_context(format!("Failed to rename {:?} to {:?}", temp_path, path))?;

    info!("Wrote {} enrichment records to {:?}", records.len(), path);
    Ok(())
}
