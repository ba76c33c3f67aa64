//! Spotify Web API Data Transfer Objects
//!
//! These types match EXACTLY what the Spotify Web API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the spotify module - convert to domain types.
//!
//! API Reference: https://developer.spotify.com/documentation/web-api

use serde::{Deserialize, Serialize};

/// Generic paging envelope used by list and search endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    /// URL of the next page, null on the last page
    pub next: Option<String>,
}

/// `GET /search?type=track` response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    /// Present because we only ask for `type=track`
    pub tracks: Option<Paging<Track>>,
}

/// Full track object
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Track {
    /// Null for local files added to playlists
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
    pub album: Option<SimplifiedAlbum>,
    #[serde(default)]
    pub duration_ms: u64,
    pub popularity: Option<u32>,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimplifiedArtist {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimplifiedAlbum {
    pub id: Option<String>,
    pub name: String,
    /// YYYY, YYYY-MM, or YYYY-MM-DD
    pub release_date: Option<String>,
}

/// `GET /artists/{id}` response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub followers: Followers,
    #[serde(default)]
    pub genres: Vec<String>,
    pub popularity: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Followers {
    pub total: u64,
}

/// `GET /me` response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub display_name: Option<String>,
}

/// Simplified playlist object from `GET /me/playlists` and playlist creation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub public: Option<bool>,
    pub owner: Option<PlaylistOwner>,
    pub tracks: Option<PlaylistTracksRef>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistOwner {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistTracksRef {
    pub total: u32,
}

/// `POST /users/{user_id}/playlists` body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub public: bool,
    pub description: String,
}

/// `POST /playlists/{id}/tracks` body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

/// Response to playlist modification
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

/// Error response from the Web API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

/// Response from the accounts service `/api/token` endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: i64,
    /// Omitted on refresh when the old refresh token stays valid
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

/// OAuth error response from the accounts service
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
