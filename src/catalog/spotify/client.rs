//! Spotify Web API HTTP client
//!
//! Handles search, playlist and artist calls against the Web API.
//! See: https://developer.spotify.com/documentation/web-api
//!
//! Every request carries the bearer token obtained by the session.
//! Non-success statuses are mapped onto [`CatalogError`] variants so
//! callers can tell rate limiting and expired tokens apart from other
//! failures.

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::{adapter, dto};
use crate::catalog::domain::{
    ArtistProfile, CatalogError, CatalogTrack, CurrentUser, PlaylistPage, PlaylistSummary,
    SearchQuery,
};

/// Default Web API root
pub const API_BASE_URL: &str = "https://api.spotify.com/v1";

/// Description set on playlists we create
const PLAYLIST_DESCRIPTION: &str = "Created by playlist-forge from a local music folder";

/// Spotify Web API client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl SpotifyClient {
    /// Create a client authenticated with `access_token`
    pub fn new(access_token: impl Into<String>) -> Result<Self, CatalogError> {
        Self::with_base_url(access_token, API_BASE_URL)
    }

    /// Create a client against a custom base URL
    pub fn with_base_url(
        access_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    /// Search for tracks, best match first
    pub async fn search_tracks(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<CatalogTrack>, CatalogError> {
        let request = self
            .http_client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("q", query.to_query_string()),
                ("type", "track".to_string()),
                ("limit", query.limit.to_string()),
            ]);

        let response: dto::SearchResponse = self.send(request).await?;
        adapter::to_tracks(response)
    }

    /// The authenticated account
    pub async fn current_user(&self) -> Result<CurrentUser, CatalogError> {
        let request = self.http_client.get(format!("{}/me", self.base_url));
        let user: dto::User = self.send(request).await?;
        Ok(adapter::to_current_user(user))
    }

    /// One page of the account's playlists
    pub async fn list_playlists(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<PlaylistPage, CatalogError> {
        let request = self
            .http_client
            .get(format!("{}/me/playlists", self.base_url))
            .query(&[("limit", limit), ("offset", offset)]);

        let page: dto::Paging<dto::Playlist> = self.send(request).await?;
        Ok(adapter::to_playlist_page(page))
    }

    /// Create a playlist for `user_id`
    pub async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        public: bool,
    ) -> Result<PlaylistSummary, CatalogError> {
        let body = dto::CreatePlaylistRequest {
            name: name.to_string(),
            public,
            description: PLAYLIST_DESCRIPTION.to_string(),
        };
        let request = self
            .http_client
            .post(format!(
                "{}/users/{}/playlists",
                self.base_url,
                urlencoding::encode(user_id)
            ))
            .json(&body);

        let playlist: dto::Playlist = self.send(request).await?;
        Ok(adapter::to_playlist_summary(playlist))
    }

    /// Append tracks to a playlist (at most 100 per call)
    pub async fn add_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), CatalogError> {
        let body = dto::AddTracksRequest {
            uris: track_ids.iter().map(|id| adapter::track_uri(id)).collect(),
        };
        let request = self
            .http_client
            .post(format!(
                "{}/playlists/{}/tracks",
                self.base_url,
                urlencoding::encode(playlist_id)
            ))
            .json(&body);

        let _snapshot: dto::SnapshotResponse = self.send(request).await?;
        Ok(())
    }

    /// Look up an artist (for follower counts)
    pub async fn artist(&self, artist_id: &str) -> Result<ArtistProfile, CatalogError> {
        let request = self.http_client.get(format!(
            "{}/artists/{}",
            self.base_url,
            urlencoding::encode(artist_id)
        ));
        let artist: dto::Artist = self.send(request).await?;
        Ok(adapter::to_artist_profile(artist))
    }

    /// Send an authenticated request and parse the JSON body
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, CatalogError> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let response = check_status(response).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

/// Map non-success statuses to errors
async fn check_status(response: Response) -> Result<Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());
        return Err(CatalogError::RateLimited { retry_after });
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(status, &body);

    Err(match status {
        StatusCode::UNAUTHORIZED => CatalogError::Unauthorized(message),
        StatusCode::NOT_FOUND => CatalogError::NotFound(message),
        _ => CatalogError::Api {
            status: status.as_u16(),
            message,
        },
    })
}

/// Message from the JSON error body, or the status text
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<dto::ApiErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| {
            let reason = status.canonical_reason().unwrap_or("Unknown");
            if body.is_empty() {
                reason.to_string()
            } else {
                format!("{} - {}", reason, body.chars().take(200).collect::<String>())
            }
        })
}
