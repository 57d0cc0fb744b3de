use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::server::AppState;

pub async fn health(Extension(state): Extension<AppState>) -> Json<Value> {
    // a running generation holds the cache; report it instead of waiting
    let cache = match state.cache.try_lock() {
        Ok(store) => json!({
            "authorized": store.record().token.is_some(),
            "playlist_id": store.record().playlist_id,
        }),
        Err(_) => json!("busy"),
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "cache": cache,
    }))
}
