//! Remote catalog: search, tiered matching and the authenticated session.
//!
//! - **Domain models** (`domain.rs`) - our types, independent of the API
//! - **Traits** (`traits.rs`) - seams for the client, mocked in tests
//! - **Matcher** (`matcher.rs`) - ordered search tiers for one track
//! - **Session** (`session.rs`) - token handling and the current user
//! - **Spotify** (`spotify/`) - DTOs, adapter and HTTP clients

pub mod domain;
pub mod matcher;
pub mod session;
pub mod spotify;
pub mod traits;

pub use domain::{
    ArtistProfile, CatalogArtist, CatalogError, CatalogTrack, CurrentUser, PlaylistPage,
    PlaylistSummary, SearchQuery,
};
pub use matcher::{CatalogMatcher, MatchOutcome, MatchTier, TierAttempt, TierResult};
pub use session::Session;
pub use traits::{ArtistApi, CatalogApi, PlaylistApi};
