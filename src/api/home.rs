use std::path::Path;

use axum::{
    Extension,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{management::CacheGuard, server::AppState, warning};

const INDEX_TEMPLATE: &str = "index";

pub async fn home(Extension(state): Extension<AppState>) -> Response {
    let path = state.settings.template_dir.join("index.html");

    // while another writer holds the cache, serve straight from disk
    let Ok(mut store) = CacheGuard::try_acquire(&state.cache) else {
        return from_disk(&path).await;
    };

    // the file may have changed since this process last read it
    if let Err(e) = store.reload().await {
        warning!("Error loading cache: {}", e);
        return from_disk(&path).await;
    }

    if let Some(template) = store.record().templates.get(INDEX_TEMPLATE) {
        return Html(template.clone()).into_response();
    }

    match async_fs::read_to_string(&path).await {
        Ok(template) => {
            store
                .record_mut()
                .templates
                .insert(INDEX_TEMPLATE.to_string(), template.clone());
            if let Err(e) = store.flush().await {
                warning!("Error saving cache: {}", e);
            }
            Html(template).into_response()
        }
        Err(e) => template_error(e),
    }
}

async fn from_disk(path: &Path) -> Response {
    match async_fs::read_to_string(path).await {
        Ok(template) => Html(template).into_response(),
        Err(e) => template_error(e),
    }
}

fn template_error(e: std::io::Error) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Error reading template file: {e}"),
    )
        .into_response()
}
