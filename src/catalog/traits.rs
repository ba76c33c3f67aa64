//! Trait definitions for the remote catalog.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses [`SpotifyClient`](super::spotify::SpotifyClient),
//! while tests substitute the mocks in [`mocks`].
//!
//! # Example
//!
//! ```ignore
//! use playlist_forge::catalog::traits::CatalogApi;
//!
//! async fn top_hit<C: CatalogApi>(client: &C, query: &SearchQuery) {
//!     let tracks = client.search_tracks(query).await?;
//! }
//! ```

use async_trait::async_trait;

use super::domain::{
    ArtistProfile, CatalogError, CatalogTrack, CurrentUser, PlaylistPage, PlaylistSummary,
    SearchQuery,
};

/// Track search.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Run one search and return results in relevance order.
    async fn search_tracks(&self, query: &SearchQuery) -> Result<Vec<CatalogTrack>, CatalogError>;
}

/// Playlist listing, creation and population.
#[async_trait]
pub trait PlaylistApi: Send + Sync {
    /// The authenticated account.
    async fn current_user(&self) -> Result<CurrentUser, CatalogError>;

    /// One page of the account's playlists.
    async fn list_playlists(&self, offset: u32, limit: u32) -> Result<PlaylistPage, CatalogError>;

    /// Create a playlist owned by `user_id`.
    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        public: bool,
    ) -> Result<PlaylistSummary, CatalogError>;

    /// Append tracks (by catalog ID) to a playlist.
    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<(), CatalogError>;
}

/// Artist lookup.
#[async_trait]
pub trait ArtistApi: Send + Sync {
    async fn artist(&self, artist_id: &str) -> Result<ArtistProfile, CatalogError>;
}

// Implement traits for the real client

#[async_trait]
impl CatalogApi for super::spotify::SpotifyClient {
    async fn search_tracks(&self, query: &SearchQuery) -> Result<Vec<CatalogTrack>, CatalogError> {
        self.search_tracks(query).await
    }
}

#[async_trait]
impl PlaylistApi for super::spotify::SpotifyClient {
    async fn current_user(&self) -> Result<CurrentUser, CatalogError> {
        self.current_user().await
    }

    async fn list_playlists(&self, offset: u32, limit: u32) -> Result<PlaylistPage, CatalogError> {
        self.list_playlists(offset, limit).await
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        public: bool,
    ) -> Result<PlaylistSummary, CatalogError> {
        self.create_playlist(user_id, name, public).await
    }

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<(), CatalogError> {
        self.add_tracks(playlist_id, track_ids).await
    }
}

#[async_trait]
impl ArtistApi for super::spotify::SpotifyClient {
    async fn artist(&self, artist_id: &str) -> Result<ArtistProfile, CatalogError> {
        self.artist(artist_id).await
    }
}
