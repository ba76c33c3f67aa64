//! Internal domain models for the remote catalog.
//!
//! These types are OUR types - they don't change when the catalog API changes.
//! All API responses get converted into these types via the adapter.

use std::time::Duration;

/// A track in the remote catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogTrack {
    /// Catalog track ID (what gets added to playlists)
    pub id: String,
    /// Catalog URI (e.g. `spotify:track:<id>`)
    pub uri: String,
    /// Track title
    pub name: String,
    /// Credited artists, primary first
    pub artists: Vec<CatalogArtist>,
    /// Album title
    pub album: Option<String>,
    /// Track duration
    pub duration: Option<Duration>,
    /// Catalog popularity (0-100)
    pub popularity: Option<u32>,
    /// Public web link
    pub external_url: Option<String>,
}

impl CatalogTrack {
    /// First credited artist
    pub fn primary_artist(&self) -> Option<&CatalogArtist> {
        self.artists.first()
    }

    /// Artist names joined for display
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Artist credit on a catalog track
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogArtist {
    pub id: Option<String>,
    pub name: String,
}

/// Artist details (only what enrichment needs)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistProfile {
    pub id: String,
    pub name: String,
    pub followers: u64,
    pub genres: Vec<String>,
}

/// The authenticated account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub display_name: Option<String>,
}

/// A playlist owned or followed by the account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub owner_id: Option<String>,
    pub track_count: Option<u32>,
}

/// One page of the account's playlists
#[derive(Debug, Clone, Default)]
pub struct PlaylistPage {
    pub items: Vec<PlaylistSummary>,
    pub total: u32,
    pub has_next: bool,
}

/// A single catalog search.
///
/// Renders to the catalog's field-qualified syntax when an artist is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub title: String,
    pub artist: Option<String>,
    pub limit: u32,
}

impl SearchQuery {
    /// Only the top result is ever used
    pub const DEFAULT_LIMIT: u32 = 1;

    pub fn title_only(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: None,
            limit: Self::DEFAULT_LIMIT,
        }
    }

    pub fn with_artist(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: Some(artist.into()),
            limit: Self::DEFAULT_LIMIT,
        }
    }

    /// Query string sent to the search endpoint
    pub fn to_query_string(&self) -> String {
        match &self.artist {
            Some(artist) => format!("track:{} artist:{}", self.title, artist),
            None => self.title.clone(),
        }
    }
}

/// Errors from the catalog API
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Access token rejected: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited - retry after {retry_after:?}s")]
    RateLimited { retry_after: Option<u64> },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("API contract violation: expected {expected}, got {actual}")]
    ContractViolation { expected: String, actual: String },
}
