use super::{SpotifyClient, client::decode};
use crate::{
    error::ApiError,
    types::{
        CreatePlaylistRequest, CurrentUser, Playlist, PlaylistsResponse, SnapshotResponse,
        TrackUrisRequest, track_uri,
    },
};

/// Spotify accepts at most 100 uris per playlist write.
const TRACKS_PER_REQUEST: usize = 100;
const PLAYLISTS_PER_PAGE: u32 = 50;

impl SpotifyClient {
    pub async fn get_current_user(&self) -> Result<CurrentUser, ApiError> {
        let url = self.url("/me");
        let response = self.execute(|http| http.get(&url)).await?;
        decode(response).await
    }

    /// Retrieves every playlist of the current user, following `next` links.
    pub async fn get_current_user_playlists(&self) -> Result<Vec<Playlist>, ApiError> {
        let mut playlists = Vec::new();
        let mut next = Some(format!(
            "{}?limit={}",
            self.url("/me/playlists"),
            PLAYLISTS_PER_PAGE
        ));

        while let Some(url) = next {
            let response = self.execute(|http| http.get(&url)).await?;
            let page: PlaylistsResponse = decode(response).await?;
            playlists.extend(page.items);
            next = page.next;
        }

        Ok(playlists)
    }

    pub async fn create_user_playlist(
        &self,
        user_id: &str,
        name: &str,
        public: bool,
    ) -> Result<Playlist, ApiError> {
        let url = self.url(&format!("/users/{user_id}/playlists"));
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: "Recommendations seeded from recently played tracks.".to_string(),
            public,
            collaborative: false,
        };

        let response = self.execute(|http| http.post(&url).json(&body)).await?;
        decode(response).await
    }

    /// Replaces the playlist contents.
    ///
    /// The first chunk overwrites the playlist, remaining chunks are appended.
    /// An empty list clears the playlist.
    pub async fn put_playlist_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), ApiError> {
        let url = self.url(&format!("/playlists/{playlist_id}/tracks"));
        let (first, rest) = track_ids.split_at(track_ids.len().min(TRACKS_PER_REQUEST));

        let body = uris_request(first);
        self.execute(|http| http.put(&url).json(&body)).await?;

        if !rest.is_empty() {
            self.post_playlist_tracks(playlist_id, rest).await?;
        }
        Ok(())
    }

    /// Appends tracks in chunks and returns the snapshot id of the last write.
    pub async fn post_playlist_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<Option<String>, ApiError> {
        let url = self.url(&format!("/playlists/{playlist_id}/tracks"));
        let mut snapshot_id = None;

        for chunk in track_ids.chunks(TRACKS_PER_REQUEST) {
            let body = uris_request(chunk);
            let response = self.execute(|http| http.post(&url).json(&body)).await?;
            let snapshot: SnapshotResponse = decode(response).await?;
            snapshot_id = Some(snapshot.snapshot_id);
        }

        Ok(snapshot_id)
    }
}

fn uris_request(track_ids: &[String]) -> TrackUrisRequest {
    TrackUrisRequest {
        uris: track_ids.iter().map(|id| track_uri(id)).collect(),
    }
}
