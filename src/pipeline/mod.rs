//! # Generation Pipeline
//!
//! Turns cached account data into the managed playlist:
//!
//! ```text
//! reload cache → clear recommendations → seeds → library → recommendations
//!              → filter by library artists → playlist sync
//! ```
//!
//! Every stage that changes the cache flushes it right away, so progress made
//! before a failing stage (e.g. a freshly fetched album list) survives into
//! the next run. Stages run strictly one after another on a [`CacheStore`]
//! the caller holds exclusively for the whole run.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    config::DEFAULT_PLAYLIST_NAME, error::GenerateError, info, management::CacheStore,
    spotify::SpotifyApi, types::Seeds,
};

mod library;
mod playlist;
mod recommendations;
mod seeds;

pub use library::{ALBUM_PAGE_SIZE, load_library};
pub use playlist::{SyncMode, SyncOutcome, sync_playlist};
pub use recommendations::{filter_by_known_artists, get_recommendations};
pub use seeds::{HISTORY_LIMIT, MAX_SEEDS, sample_seeds, select_seeds};

/// Flags of one generation trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Overwrite the managed playlist instead of appending to it.
    pub replace: bool,
    pub use_seed_from_history: bool,
    /// Name used when the managed playlist has to be created.
    pub playlist_name: String,
}

impl GenerateOptions {
    pub fn new(replace: bool, use_seed_from_history: bool) -> Self {
        Self {
            replace,
            use_seed_from_history,
            playlist_name: DEFAULT_PLAYLIST_NAME.to_string(),
        }
    }

    pub fn playlist_name(mut self, name: impl Into<String>) -> Self {
        self.playlist_name = name.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    pub seeds: Seeds,
    pub recommended: usize,
    pub kept: usize,
    pub sync: SyncOutcome,
}

/// Runs one generation with a random source seeded from the OS.
pub async fn generate(
    api: &dyn SpotifyApi,
    store: &mut CacheStore,
    replace: bool,
    use_seed_from_history: bool,
) -> Result<GenerateSummary, GenerateError> {
    let options = GenerateOptions::new(replace, use_seed_from_history);
    run(api, store, &options, &mut StdRng::from_os_rng()).await
}

/// Runs one generation, drawing seeds from `rng`.
pub async fn run<R: Rng>(
    api: &dyn SpotifyApi,
    store: &mut CacheStore,
    options: &GenerateOptions,
    rng: &mut R,
) -> Result<GenerateSummary, GenerateError> {
    store.reload().await?;
    store.record_mut().recommendations = None;

    let seeds = select_seeds(api, store, options.use_seed_from_history, rng).await?;
    let library = load_library(api, store).await?;
    let recommended = get_recommendations(api, store, &seeds).await?;

    let tracks = filter_by_known_artists(&recommended, &library);
    info!(
        "Kept {} of {} recommendations after removing known artists",
        tracks.len(),
        recommended.len()
    );

    let sync = sync_playlist(api, store, &tracks, options.replace, &options.playlist_name).await?;

    Ok(GenerateSummary {
        seeds,
        recommended: recommended.len(),
        kept: tracks.len(),
        sync,
    })
}
