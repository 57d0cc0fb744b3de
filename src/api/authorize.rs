use std::collections::HashMap;

use axum::{
    Extension,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::{management::CacheGuard, server::AppState, spotify::auth, warning};

pub async fn authorize(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<AppState>,
) -> Response {
    let Some(code) = params.get("code") else {
        let reason = params
            .get("error")
            .map(String::as_str)
            .unwrap_or("missing authorization code");
        return token_error(StatusCode::BAD_REQUEST, reason);
    };

    // a verifier is only good for one exchange
    let Some(pkce) = state.pkce.lock().await.take() else {
        return token_error(StatusCode::BAD_REQUEST, "no authorization in progress");
    };

    if params.get("state") != Some(&pkce.state) {
        return token_error(StatusCode::BAD_REQUEST, "state mismatch");
    }

    let token = match auth::exchange_code_pkce(&state.settings, code, &pkce.code_verifier).await {
        Ok(token) => token,
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            return token_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
        }
    };

    let mut store = match CacheGuard::acquire(&state.cache).await {
        Ok(store) => store,
        Err(e) => {
            warning!("Cannot lock cache: {}", e);
            return token_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
        }
    };
    if let Err(e) = store.reload().await {
        warning!("Error loading cache: {}", e);
    }
    store.record_mut().token = Some(token);
    if let Err(e) = store.flush().await {
        warning!("Error saving cache: {}", e);
    }

    Redirect::to("/home").into_response()
}

fn token_error(status: StatusCode, reason: &str) -> Response {
    (status, format!("Couldn't get token: {reason}")).into_response()
}
