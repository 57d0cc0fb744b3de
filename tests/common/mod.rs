#![allow(dead_code)]

use std::{collections::HashMap, path::Path, sync::Mutex};

use async_trait::async_trait;
use randrecs::{
    error::ApiError,
    management::{CacheRecord, CacheStore},
    spotify::SpotifyApi,
    types::{
        Album, Artist, CurrentUser, Playlist, RecentlyPlayedItem, RecommendationParams,
        Recommendations, SavedAlbum, Seeds, Track,
    },
};

/// Every request the fake received, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CurrentUser,
    Playlists,
    CreatePlaylist(String),
    Replace(String, Vec<String>),
    Add(String, Vec<String>),
    SavedAlbums { limit: u32, offset: u32 },
    RecentlyPlayed(u32),
    Recommendations(Vec<String>),
}

/// In-memory Spotify account.
#[derive(Default)]
pub struct FakeSpotify {
    pub album_pages: Vec<Vec<SavedAlbum>>,
    pub failing_album_page: Option<usize>,
    pub history: Vec<RecentlyPlayedItem>,
    pub recommendations: Recommendations,
    pub failing_recommendations: bool,
    pub playlists: Mutex<Vec<Playlist>>,
    pub contents: Mutex<HashMap<String, Vec<String>>>,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeSpotify {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(*c)).count()
    }

    pub fn contents_of(&self, playlist_id: &str) -> Vec<String> {
        self.contents
            .lock()
            .unwrap()
            .get(playlist_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn with_playlist(self, id: &str, track_ids: &[&str]) -> Self {
        self.playlists.lock().unwrap().push(playlist(id, "Random Recs"));
        self.contents.lock().unwrap().insert(
            id.to_string(),
            track_ids.iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SpotifyApi for FakeSpotify {
    async fn current_user(&self) -> Result<CurrentUser, ApiError> {
        self.record(Call::CurrentUser);
        Ok(CurrentUser {
            id: "user-1".to_string(),
            display_name: Some("Test User".to_string()),
        })
    }

    async fn current_user_playlists(&self) -> Result<Vec<Playlist>, ApiError> {
        self.record(Call::Playlists);
        Ok(self.playlists.lock().unwrap().clone())
    }

    async fn create_playlist(
        &self,
        _user_id: &str,
        name: &str,
        _public: bool,
    ) -> Result<Playlist, ApiError> {
        self.record(Call::CreatePlaylist(name.to_string()));
        let mut playlists = self.playlists.lock().unwrap();
        let created = playlist(&format!("playlist-{}", playlists.len() + 1), name);
        playlists.push(created.clone());
        self.contents
            .lock()
            .unwrap()
            .insert(created.id.clone(), Vec::new());
        Ok(created)
    }

    async fn replace_playlist_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), ApiError> {
        self.record(Call::Replace(playlist_id.to_string(), track_ids.to_vec()));
        self.contents
            .lock()
            .unwrap()
            .insert(playlist_id.to_string(), track_ids.to_vec());
        Ok(())
    }

    async fn add_tracks_to_playlist(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<Option<String>, ApiError> {
        self.record(Call::Add(playlist_id.to_string(), track_ids.to_vec()));
        self.contents
            .lock()
            .unwrap()
            .entry(playlist_id.to_string())
            .or_default()
            .extend(track_ids.iter().cloned());
        Ok(Some("snapshot-1".to_string()))
    }

    async fn saved_albums(&self, limit: u32, offset: u32) -> Result<Vec<SavedAlbum>, ApiError> {
        self.record(Call::SavedAlbums { limit, offset });
        let page = (offset / limit) as usize;
        if self.failing_album_page == Some(page) {
            return Err(ApiError::Status {
                status: 500,
                message: "server error".to_string(),
            });
        }
        Ok(self.album_pages.get(page).cloned().unwrap_or_default())
    }

    async fn recently_played(&self, limit: u32) -> Result<Vec<RecentlyPlayedItem>, ApiError> {
        self.record(Call::RecentlyPlayed(limit));
        Ok(self.history.iter().take(limit as usize).cloned().collect())
    }

    async fn recommendations(
        &self,
        seeds: &Seeds,
        _params: &RecommendationParams,
    ) -> Result<Recommendations, ApiError> {
        self.record(Call::Recommendations(seeds.tracks.clone()));
        if self.failing_recommendations {
            return Err(ApiError::Status {
                status: 404,
                message: "seed track not found".to_string(),
            });
        }
        Ok(self.recommendations.clone())
    }
}

pub fn artist(id: &str) -> Artist {
    Artist {
        id: id.to_string(),
        name: format!("Artist {id}"),
    }
}

pub fn saved_album(id: &str, artist_ids: &[&str]) -> SavedAlbum {
    SavedAlbum {
        added_at: "2024-01-01T00:00:00Z".to_string(),
        album: Album {
            id: id.to_string(),
            name: format!("Album {id}"),
            release_date: "2020-05-01".to_string(),
            artists: artist_ids.iter().map(|a| artist(a)).collect(),
        },
    }
}

pub fn track(id: &str, artist_ids: &[&str]) -> Track {
    Track {
        id: id.to_string(),
        name: format!("Track {id}"),
        uri: format!("spotify:track:{id}"),
        artists: artist_ids.iter().map(|a| artist(a)).collect(),
    }
}

pub fn played(track_id: &str) -> RecentlyPlayedItem {
    RecentlyPlayedItem {
        track: track(track_id, &["history-artist"]),
        played_at: "2024-03-01T12:00:00Z".to_string(),
    }
}

/// `n` plays of distinct tracks `h0..h{n-1}`.
pub fn history(n: usize) -> Vec<RecentlyPlayedItem> {
    (0..n).map(|i| played(&format!("h{i}"))).collect()
}

pub fn playlist(id: &str, name: &str) -> Playlist {
    Playlist {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        public: Some(false),
        collaborative: false,
        snapshot_id: "snapshot-0".to_string(),
    }
}

pub fn recommendations(tracks: Vec<Track>) -> Recommendations {
    Recommendations {
        seeds: Vec::new(),
        tracks,
    }
}

/// An empty store backed by `cache.json` inside `dir`. Nothing is written yet.
pub fn empty_store(dir: &Path) -> CacheStore {
    CacheStore::with_record(dir.join("cache.json"), CacheRecord::default())
}
