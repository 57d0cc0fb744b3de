use rand::{Rng, seq::SliceRandom};

use crate::{
    error::GenerateError, info, management::CacheStore, spotify::SpotifyApi, types::Seeds, utils,
};

/// Plays fetched when the cached history is empty.
pub const HISTORY_LIMIT: u32 = 50;
/// Spotify accepts at most five seeds per recommendations request.
pub const MAX_SEEDS: usize = 5;

/// Picks up to [`MAX_SEEDS`] distinct tracks from the recently played history.
///
/// The history is fetched and cached on first use. Seeding without history
/// is not supported and fails with [`GenerateError::HistorySeedingDisabled`].
pub async fn select_seeds<R: Rng>(
    api: &dyn SpotifyApi,
    store: &mut CacheStore,
    use_history: bool,
    rng: &mut R,
) -> Result<Seeds, GenerateError> {
    let pool = history_pool(api, store, use_history).await?;
    Ok(sample_seeds(&pool, rng))
}

/// Distinct track ids of the cached history, most recent first.
async fn history_pool(
    api: &dyn SpotifyApi,
    store: &mut CacheStore,
    use_history: bool,
) -> Result<Vec<String>, GenerateError> {
    if !use_history {
        return Err(GenerateError::HistorySeedingDisabled);
    }

    if store.record().recently_played.is_empty() {
        info!("Getting last {} played tracks", HISTORY_LIMIT);
        let recent = api.recently_played(HISTORY_LIMIT).await?;
        store.record_mut().recently_played = recent;
        store.flush().await?;
    }

    let track_ids: Vec<String> = store
        .record()
        .recently_played
        .iter()
        .map(|item| item.track.id.clone())
        .collect();
    let pool = utils::dedup_by_key(&track_ids, |id| id.clone());

    if pool.is_empty() {
        return Err(GenerateError::EmptyHistory);
    }

    Ok(pool)
}

/// Shuffles the index range of `pool` and keeps the first [`MAX_SEEDS`].
///
/// Each index is used at most once, so the seeds are as distinct as the pool.
pub fn sample_seeds<R: Rng + ?Sized>(pool: &[String], rng: &mut R) -> Seeds {
    let mut indices: Vec<usize> = (0..pool.len()).collect();
    indices.shuffle(rng);
    indices.truncate(MAX_SEEDS);

    Seeds {
        tracks: indices.into_iter().map(|i| pool[i].clone()).collect(),
    }
}
