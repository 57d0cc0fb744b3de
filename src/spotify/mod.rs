//! # Spotify Integration Module
//!
//! Interface to the Spotify Web API. The generation pipeline only ever talks to
//! the [`SpotifyApi`] trait; [`SpotifyClient`] is the reqwest implementation
//! used by the server and the CLI, and tests substitute an in-memory fake.
//!
//! ## Architecture
//!
//! ```text
//! Pipeline (library, seeds, recommendations, playlist sync)
//!          ↓
//! SpotifyApi trait
//!          ↓
//! SpotifyClient
//!     ├── library   (GET /me/albums)
//!     ├── player    (GET /me/player/recently-played)
//!     ├── browse    (GET /recommendations)
//!     └── playlist  (GET /me, GET /me/playlists, POST/PUT playlist tracks)
//!          ↓
//! reqwest (timeouts, bounded retry)
//! ```
//!
//! [`auth`] holds the OAuth 2.0 PKCE helpers: authorization URL, code
//! exchange and token refresh.
//!
//! ## Error Handling
//!
//! Every call returns [`ApiError`]. Connection failures, timeouts and
//! 502/503/504 responses are retried with a growing delay up to the configured
//! retry count; 429 responses wait for `Retry-After` when it is at most 120
//! seconds. 401 and 403 are never retried.

use async_trait::async_trait;

use crate::{
    error::ApiError,
    types::{
        CurrentUser, Playlist, RecentlyPlayedItem, RecommendationParams, Recommendations,
        SavedAlbum, Seeds,
    },
};

pub mod auth;
mod browse;
mod client;
mod library;
mod player;
mod playlist;

pub use client::SpotifyClient;

/// Spotify operations the generation pipeline depends on.
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    async fn current_user(&self) -> Result<CurrentUser, ApiError>;

    /// All playlists of the current user, across every page.
    async fn current_user_playlists(&self) -> Result<Vec<Playlist>, ApiError>;

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        public: bool,
    ) -> Result<Playlist, ApiError>;

    /// Overwrites the playlist so it contains exactly `track_ids`.
    async fn replace_playlist_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), ApiError>;

    /// Appends `track_ids` and returns the new snapshot id, if anything was added.
    async fn add_tracks_to_playlist(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<Option<String>, ApiError>;

    /// One page of the user's saved albums.
    async fn saved_albums(&self, limit: u32, offset: u32) -> Result<Vec<SavedAlbum>, ApiError>;

    /// The most recent plays, newest first.
    async fn recently_played(&self, limit: u32) -> Result<Vec<RecentlyPlayedItem>, ApiError>;

    async fn recommendations(
        &self,
        seeds: &Seeds,
        params: &RecommendationParams,
    ) -> Result<Recommendations, ApiError>;
}
