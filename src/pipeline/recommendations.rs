use crate::{
    error::GenerateError,
    info,
    management::CacheStore,
    spotify::SpotifyApi,
    types::{RecommendationParams, SavedAlbum, Seeds, Track},
    utils,
};

/// Returns the recommended tracks for `seeds`.
///
/// A recommendations snapshot already in the cache is reused as is; otherwise
/// the full response is cached and flushed.
pub async fn get_recommendations(
    api: &dyn SpotifyApi,
    store: &mut CacheStore,
    seeds: &Seeds,
) -> Result<Vec<Track>, GenerateError> {
    if let Some(cached) = &store.record().recommendations {
        info!("Reusing {} cached recommendations", cached.tracks.len());
        return Ok(cached.tracks.clone());
    }

    let response = api
        .recommendations(seeds, &RecommendationParams::default())
        .await?;
    let tracks = response.tracks.clone();

    store.record_mut().recommendations = Some(response);
    store.flush().await?;

    Ok(tracks)
}

/// Drops tracks whose artists are all already present in the library.
///
/// A track with at least one artist missing from the library is kept once, in
/// recommendation order. A track without any artist is dropped.
pub fn filter_by_known_artists(tracks: &[Track], library: &[SavedAlbum]) -> Vec<Track> {
    let known = utils::library_artist_ids(library);

    let kept: Vec<Track> = tracks
        .iter()
        .filter(|track| track.artists.iter().any(|a| !known.contains(&a.id)))
        .cloned()
        .collect();

    utils::dedup_by_key(&kept, |track| track.id.clone())
}
