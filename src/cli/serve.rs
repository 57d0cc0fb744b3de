use crate::{
    config::Settings,
    error, info,
    server::{AppState, start_api_server},
};

pub async fn serve(settings: Settings) {
    let store = super::open_cache(&settings).await;

    if store.record().token.is_none() {
        info!(
            "No Spotify account connected yet. Open http://{}/connect",
            settings.server_addr
        );
    }

    let state = AppState::new(settings, store.shared());
    if let Err(e) = start_api_server(state).await {
        error!("Server stopped. Err: {}", e);
    }
}
