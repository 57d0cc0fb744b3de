use super::{SpotifyClient, client::decode};
use crate::{
    error::ApiError,
    types::{SavedAlbum, SavedAlbumsResponse},
};

impl SpotifyClient {
    /// Retrieves one page of the albums saved in the user's library.
    ///
    /// Spotify caps `limit` at 50. The caller advances `offset` and stops on an
    /// empty page.
    pub async fn get_saved_albums(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SavedAlbum>, ApiError> {
        let url = self.url("/me/albums");
        let response = self
            .execute(|http| {
                http.get(&url)
                    .query(&[("limit", limit), ("offset", offset)])
            })
            .await?;

        let page: SavedAlbumsResponse = decode(response).await?;
        Ok(page.items)
    }
}
