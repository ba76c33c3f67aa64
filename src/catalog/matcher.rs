//! Catalog matcher - tiered search for a single best track
//!
//! Tiers are tried in order and the first one returning a result wins:
//! 1. Precise: title and artist as field-qualified constraints
//! 2. Featured artist: precise search with only the part before "feat."
//! 3. Title only
//!
//! A failing search is recorded and the next tier is tried.

use std::fmt;

use tracing::{debug, warn};

use super::domain::{CatalogError, CatalogTrack, SearchQuery};
use super::traits::CatalogApi;
use crate::model::TrackMetadata;

/// Marker separating a primary artist from featured guests.
const FEATURED_MARKER: &str = "feat.";

/// One search strategy in the fallback sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchTier {
    Precise,
    FeaturedArtist,
    TitleOnly,
}

impl MatchTier {
    /// Tiers in the order they are tried.
    pub const ALL: [MatchTier; 3] = [
        MatchTier::Precise,
        MatchTier::FeaturedArtist,
        MatchTier::TitleOnly,
    ];

    /// Build this tier's query, or `None` if the tier doesn't apply.
    pub fn build_query(self, metadata: &TrackMetadata) -> Option<SearchQuery> {
        let title = metadata.title.as_deref()?;

        match self {
            MatchTier::Precise => {
                let artist = metadata.artist.as_deref()?;
                Some(SearchQuery::with_artist(title, artist))
            }
            MatchTier::FeaturedArtist => {
                let primary = primary_artist(metadata.artist.as_deref()?)?;
                Some(SearchQuery::with_artist(title, primary))
            }
            MatchTier::TitleOnly => Some(SearchQuery::title_only(title)),
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchTier::Precise => "precise",
            MatchTier::FeaturedArtist => "featured-artist",
            MatchTier::TitleOnly => "title-only",
        };
        f.write_str(name)
    }
}

/// Text before a case-insensitive "feat." marker, trimmed.
///
/// Returns `None` when there is no marker or nothing precedes it.
pub fn primary_artist(artist: &str) -> Option<&str> {
    // ASCII lowercasing keeps byte offsets aligned with the original
    let index = artist.to_ascii_lowercase().find(FEATURED_MARKER)?;
    let primary = artist[..index].trim();
    (!primary.is_empty()).then_some(primary)
}

/// What one tier's search returned.
#[derive(Debug, Clone)]
pub enum TierResult {
    Hit(CatalogTrack),
    Empty,
    Failed(CatalogError),
}

/// A search issued by one tier.
#[derive(Debug, Clone)]
pub struct TierAttempt {
    pub tier: MatchTier,
    pub query: SearchQuery,
    pub result: TierResult,
}

/// Every tier attempted for one track, in order.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    pub attempts: Vec<TierAttempt>,
}

impl MatchOutcome {
    /// The winning tier and its track.
    pub fn matched(&self) -> Option<(MatchTier, &CatalogTrack)> {
        self.attempts.iter().find_map(|a| match &a.result {
            TierResult::Hit(track) => Some((a.tier, track)),
            _ => None,
        })
    }

    pub fn track_id(&self) -> Option<&str> {
        self.matched().map(|(_, t)| t.id.as_str())
    }

    /// Errors from tiers that failed outright.
    pub fn errors(&self) -> impl Iterator<Item = (MatchTier, &CatalogError)> {
        self.attempts.iter().filter_map(|a| match &a.result {
            TierResult::Failed(e) => Some((a.tier, e)),
            _ => None,
        })
    }
}

/// Finds at most one catalog track for resolved metadata.
pub struct CatalogMatcher<'a, C: CatalogApi> {
    api: &'a C,
}

impl<'a, C: CatalogApi> CatalogMatcher<'a, C> {
    pub fn new(api: &'a C) -> Self {
        Self { api }
    }

    /// Try each applicable tier until one returns a track.
    pub async fn find_match(&self, metadata: &TrackMetadata) -> MatchOutcome {
        let mut outcome = MatchOutcome::default();

        for tier in MatchTier::ALL {
            let Some(query) = tier.build_query(metadata) else {
                continue;
            };

            debug!(%tier, query = %query.to_query_string(), "Searching catalog");

            let result = match self.api.search_tracks(&query).await {
                Ok(tracks) => match tracks.into_iter().next() {
                    Some(track) => TierResult::Hit(track),
                    None => TierResult::Empty,
                },
                Err(e) => {
                    warn!("Search failed on {} tier for '{}': {}", tier, query.title, e);
                    TierResult::Failed(e)
                }
            };

            let hit = matches!(result, TierResult::Hit(_));
            outcome.attempts.push(TierAttempt {
                tier,
                query,
                result,
            });
            if hit {
                break;
            }
        }

        outcome
    }
}
