use axum::{Extension, Router, routing::get};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

use crate::{Res, api, config::Settings, info, management::SharedCache, types::PkceToken};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub cache: SharedCache,
    /// Authorization attempt started by the last `/connect`.
    pub pkce: Arc<Mutex<Option<PkceToken>>>,
}

impl AppState {
    pub fn new(settings: Settings, cache: SharedCache) -> Self {
        Self {
            settings: Arc::new(settings),
            cache,
            pkce: Arc::new(Mutex::new(None)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/home", get(api::home))
        .route("/connect", get(api::connect))
        .route("/authorize", get(api::authorize))
        .route("/generate", get(api::generate))
        .layer(Extension(state))
}

/// Binds `addr`, which may name a host (`localhost:9001`) or an IP address.
pub async fn bind(addr: &str) -> Res<TcpListener> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    Ok(listener)
}

pub async fn start_api_server(state: AppState) -> Res<()> {
    let listener = bind(&state.settings.server_addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
