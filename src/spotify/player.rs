use super::{SpotifyClient, client::decode};
use crate::{
    error::ApiError,
    types::{RecentlyPlayedItem, RecentlyPlayedResponse},
};

impl SpotifyClient {
    /// Retrieves the user's last `limit` plays (Spotify allows up to 50).
    pub async fn get_recently_played(
        &self,
        limit: u32,
    ) -> Result<Vec<RecentlyPlayedItem>, ApiError> {
        let url = self.url("/me/player/recently-played");
        let response = self
            .execute(|http| http.get(&url).query(&[("limit", limit)]))
            .await?;

        let history: RecentlyPlayedResponse = decode(response).await?;
        Ok(history.items)
    }
}
