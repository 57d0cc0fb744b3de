use rand::{SeedableRng, rngs::StdRng};

use crate::{
    config::Settings,
    error,
    error::GenerateError,
    info, management,
    pipeline::{self, GenerateOptions},
    success,
};

pub async fn generate(settings: Settings, replace: bool, use_history: bool) {
    let _lock = super::lock_cache(&settings);
    let mut store = super::open_cache(&settings).await;

    let pb = super::spinner("Connecting to Spotify...");
    let client = management::authorized_client(&settings, &mut store).await;
    pb.finish_and_clear();

    let client = match client {
        Ok(client) => client,
        Err(GenerateError::NotAuthorized) => {
            error!("No Spotify account connected. Please run randrecs auth")
        }
        Err(e) => error!("Cannot connect to Spotify. Err: {}", e),
    };

    let options =
        GenerateOptions::new(replace, use_history).playlist_name(settings.playlist_name.clone());

    match pipeline::run(&client, &mut store, &options, &mut StdRng::from_os_rng()).await {
        Ok(summary) => {
            info!("Seeds: {}", summary.seeds.tracks.join(", "));
            success!(
                "Playlist saved. {} of {} recommendations kept.",
                summary.kept,
                summary.recommended
            );
        }
        Err(e) => error!("Problem generating playlist: {}", e),
    }
}
