use crate::{config::Settings, error, success, warning};

/// Which cached entries to drop.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResetTargets {
    pub albums: bool,
    pub history: bool,
    pub playlist: bool,
    pub all: bool,
}

/// Explicitly invalidates cached data. The token is kept.
pub async fn reset(settings: Settings, targets: ResetTargets) {
    if !(targets.albums || targets.history || targets.playlist || targets.all) {
        warning!("Nothing to reset. Pass --albums, --history, --playlist or --all.");
        return;
    }

    let _lock = super::lock_cache(&settings);
    let mut store = super::open_cache(&settings).await;
    let record = store.record_mut();

    if targets.albums || targets.all {
        record.albums.clear();
    }
    if targets.history || targets.all {
        record.recently_played.clear();
    }
    if targets.playlist || targets.all {
        record.playlist_id = None;
    }
    if targets.all {
        record.recommendations = None;
        record.templates.clear();
    }

    if let Err(e) = store.flush().await {
        error!("Failed to save cache. Err: {}", e);
    }
    success!("Cache reset.");
}
