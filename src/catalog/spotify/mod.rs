//! Spotify Web API integration
//!
//! Track search, playlist management and artist lookup, authenticated
//! through the accounts service authorization-code flow.
//!
//! API docs: https://developer.spotify.com/documentation/web-api

pub mod auth;
pub mod dto;
mod adapter;
mod client;

pub use auth::{AuthClient, AuthError, OAuthConfig, StoredToken, TokenCache};
pub use client::SpotifyClient;
