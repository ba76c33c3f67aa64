//! Adapter layer: Convert Spotify DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! If the Web API changes its response format, only this file and dto.rs
//! need to change.

use std::time::Duration;

use super::dto;
use crate::catalog::domain::{
    ArtistProfile, CatalogArtist, CatalogError, CatalogTrack, CurrentUser, PlaylistPage,
    PlaylistSummary,
};

/// Convert search results to catalog tracks, keeping relevance order.
///
/// Tracks without an ID (local files) can't be added to playlists and are dropped.
pub fn to_tracks(response: dto::SearchResponse) -> Result<Vec<CatalogTrack>, CatalogError> {
    let paging = response
        .tracks
        .ok_or_else(|| CatalogError::ContractViolation {
            expected: "tracks paging object".to_string(),
            actual: "no tracks field".to_string(),
        })?;

    Ok(paging.items.into_iter().filter_map(to_track).collect())
}

/// Convert a single track.
pub fn to_track(track: dto::Track) -> Option<CatalogTrack> {
    let id = track.id?;

    let artists = track
        .artists
        .into_iter()
        .map(|a| CatalogArtist {
            id: a.id,
            name: a.name,
        })
        .collect();

    Some(CatalogTrack {
        id,
        uri: track.uri,
        name: track.name,
        artists,
        album: track.album.map(|a| a.name),
        duration: (track.duration_ms > 0).then(|| Duration::from_millis(track.duration_ms)),
        popularity: track.popularity,
        external_url: track.external_urls.spotify,
    })
}

pub fn to_artist_profile(artist: dto::Artist) -> ArtistProfile {
    ArtistProfile {
        id: artist.id,
        name: artist.name,
        followers: artist.followers.total,
        genres: artist.genres,
    }
}

pub fn to_current_user(user: dto::User) -> CurrentUser {
    CurrentUser {
        id: user.id,
        display_name: user.display_name,
    }
}

pub fn to_playlist_summary(playlist: dto::Playlist) -> PlaylistSummary {
    PlaylistSummary {
        id: playlist.id,
        name: playlist.name,
        owner_id: playlist.owner.map(|o| o.id),
        track_count: playlist.tracks.map(|t| t.total),
    }
}

pub fn to_playlist_page(page: dto::Paging<dto::Playlist>) -> PlaylistPage {
    PlaylistPage {
        has_next: page.next.is_some(),
        total: page.total,
        items: page.items.into_iter().map(to_playlist_summary).collect(),
    }
}

/// Catalog URI for a track ID.
pub fn track_uri(track_id: &str) -> String {
    if track_id.starts_with("spotify:track:") {
        track_id.to_string()
    } else {
        format!("spotify:track:{}", track_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_track(id: Option<&str>, name: &str) -> dto::Track {
        dto::Track {
            id: id.map(String::from),
            name: name.to_string(),
            uri: format!("spotify:track:{}", id.unwrap_or("local")),
            artists: vec![dto::SimplifiedArtist {
                id: Some("artist-1".to_string()),
                name: "Massive Attack".to_string(),
            }],
            album: Some(dto::SimplifiedAlbum {
                id: None,
                name: "Mezzanine".to_string(),
                release_date: Some("1998-04-20".to_string()),
            }),
            duration_ms: 330_773,
            popularity: Some(72),
            explicit: false,
            external_urls: dto::ExternalUrls::default(),
        }
    }

    #[test]
    fn test_convert_track() {
        let track = to_track(make_track(Some("t1"), "Teardrop")).unwrap();

        assert_eq!(track.id, "t1");
        assert_eq!(track.name, "Teardrop");
        assert_eq!(track.album.as_deref(), Some("Mezzanine"));
        assert_eq!(track.duration, Some(Duration::from_millis(330_773)));
        assert_eq!(track.primary_artist().unwrap().id.as_deref(), Some("artist-1"));
    }

    #[test]
    fn test_tracks_without_id_dropped_order_kept() {
        let response = dto::SearchResponse {
            tracks: Some(dto::Paging {
                items: vec![
                    make_track(None, "Local"),
                    make_track(Some("a"), "First"),
                    make_track(Some("b"), "Second"),
                ],
                total: 3,
                limit: 3,
                offset: 0,
                next: None,
            }),
        };

        let tracks = to_tracks(response).unwrap();

        let ids: Vec<_> = tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_missing_tracks_is_contract_violation() {
        let result = to_tracks(dto::SearchResponse { tracks: None });
        assert!(matches!(result, Err(CatalogError::ContractViolation { .. })));
    }

    #[test]
    fn test_playlist_page_has_next() {
        let page = dto::Paging {
            items: vec![dto::Playlist {
                id: "p1".to_string(),
                name: "Road Trip".to_string(),
                public: Some(true),
                owner: Some(dto::PlaylistOwner {
                    id: "me".to_string(),
                    display_name: None,
                }),
                tracks: Some(dto::PlaylistTracksRef { total: 3 }),
            }],
            total: 51,
            limit: 50,
            offset: 0,
            next: Some("https://api.spotify.com/v1/me/playlists?offset=50&limit=50".to_string()),
        };

        let converted = to_playlist_page(page);

        assert!(converted.has_next);
        assert_eq!(converted.total, 51);
        assert_eq!(converted.items[0].owner_id.as_deref(), Some("me"));
        assert_eq!(converted.items[0].track_count, Some(3));
    }

    #[test]
    fn test_track_uri() {
        assert_eq!(track_uri("abc"), "spotify:track:abc");
        assert_eq!(track_uri("spotify:track:abc"), "spotify:track:abc");
    }
}
