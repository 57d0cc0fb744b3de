use chrono::Local;

use crate::{
    error::GenerateError, info, management::CacheStore, spotify::SpotifyApi, success,
    types::Track,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    Replaced,
    Appended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub playlist_id: String,
    pub created: bool,
    pub mode: SyncMode,
}

/// Writes `tracks` into the managed playlist.
///
/// The playlist whose id is cached is reused while the user still has it;
/// otherwise a private playlist named `playlist_name` is created and its id
/// cached. An existing playlist is overwritten when `replace` is set, in every
/// other case the tracks are appended.
pub async fn sync_playlist(
    api: &dyn SpotifyApi,
    store: &mut CacheStore,
    tracks: &[Track],
    replace: bool,
    playlist_name: &str,
) -> Result<SyncOutcome, GenerateError> {
    let user = api.current_user().await?;
    let playlists = api.current_user_playlists().await?;

    let cached_id = store.record().playlist_id.clone();
    let existing = cached_id
        .as_deref()
        .and_then(|id| playlists.iter().find(|p| p.id == id));

    let (playlist_id, created) = match existing {
        Some(playlist) => (playlist.id.clone(), false),
        None => {
            let playlist = api.create_playlist(&user.id, playlist_name, false).await?;
            info!("Created playlist {} ({})", playlist.name, playlist.id);
            store.record_mut().playlist_id = Some(playlist.id.clone());
            store.flush().await?;
            (playlist.id, true)
        }
    };

    let track_ids: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();
    let now = Local::now().format("%m-%d-%y %H:%M").to_string();

    let mode = if !created && replace {
        api.replace_playlist_tracks(&playlist_id, &track_ids).await?;
        success!("{} Replaced playlist with {} tracks.", now, track_ids.len());
        SyncMode::Replaced
    } else {
        let snapshot_id = api.add_tracks_to_playlist(&playlist_id, &track_ids).await?;
        success!(
            "{} Saved playlist. {}",
            now,
            snapshot_id.unwrap_or_else(|| "nothing to add".to_string())
        );
        SyncMode::Appended
    };

    store.flush().await?;

    Ok(SyncOutcome {
        playlist_id,
        created,
        mode,
    })
}
