use crate::{
    error::GenerateError, info, management::CacheStore, spotify::SpotifyApi, types::SavedAlbum,
};

/// Saved albums requested per page. Spotify's maximum for `/me/albums`.
pub const ALBUM_PAGE_SIZE: u32 = 50;

/// Returns the user's saved albums, fetching them only when the cache has none.
///
/// Pages are requested at offset `page * ALBUM_PAGE_SIZE` until one comes back
/// empty. The complete list is cached and flushed; a failing page aborts the
/// load and nothing is cached.
pub async fn load_library(
    api: &dyn SpotifyApi,
    store: &mut CacheStore,
) -> Result<Vec<SavedAlbum>, GenerateError> {
    if !store.record().albums.is_empty() {
        info!("Using {} cached albums", store.record().albums.len());
        return Ok(store.record().albums.clone());
    }

    let mut albums: Vec<SavedAlbum> = Vec::new();
    let mut page: u32 = 0;

    loop {
        info!("Getting page {} of albums", page + 1);
        let items = api
            .saved_albums(ALBUM_PAGE_SIZE, page * ALBUM_PAGE_SIZE)
            .await?;

        if items.is_empty() {
            break;
        }

        albums.extend(items);
        page += 1;
    }

    store.record_mut().albums = albums.clone();
    store.flush().await?;

    Ok(albums)
}
