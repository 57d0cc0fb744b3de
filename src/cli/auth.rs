use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio::time::{Instant, sleep};

use crate::{
    config::Settings,
    error,
    management::SharedCache,
    server::{AppState, start_api_server},
    success,
    types::Token,
    warning,
};

/// Runs the web service in the background and walks the user through `/connect`.
///
/// The `/authorize` callback stores the token in the cache; this only waits
/// until a token newer than the start of the command shows up there.
pub async fn auth(settings: Settings) {
    let store = super::open_cache(&settings).await;
    let started_at = Utc::now().timestamp() as u64;
    let connect_url = format!("http://{}/connect", settings.server_addr);

    let state = AppState::new(settings, store.shared());
    let cache = Arc::clone(&state.cache);
    tokio::spawn(async move {
        if let Err(e) = start_api_server(state).await {
            warning!("Server stopped. Err: {}", e);
        }
    });

    if webbrowser::open(&connect_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            connect_url
        )
    }

    match wait_for_token(cache, started_at).await {
        Some(_) => success!("Authentication successful!"),
        None => error!("Authentication failed or timed out."),
    }
}

/// Polls the cache once a second for up to two minutes.
async fn wait_for_token(cache: SharedCache, since: u64) -> Option<Token> {
    let max_wait = Duration::from_secs(120);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        {
            let store = cache.lock().await;
            if let Some(token) = &store.record().token {
                if token.obtained_at >= since {
                    return Some(token.clone());
                }
            }
        }
        sleep(Duration::from_secs(1)).await;
    }

    None
}
