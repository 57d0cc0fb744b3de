use std::collections::HashMap;

use axum::{
    Extension,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    error::{ApiError, GenerateError},
    management,
    pipeline::{self, GenerateOptions},
    server::AppState,
    success, utils, warning,
};

pub async fn generate(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<AppState>,
) -> Response {
    let (replace, seed) = match (flag(&params, "replace"), flag(&params, "seed")) {
        (Ok(replace), Ok(seed)) => (replace, seed),
        (Err(e), _) | (_, Err(e)) => {
            return (
                StatusCode::BAD_REQUEST,
                format!("Problem generating playlist: {e}"),
            )
                .into_response();
        }
    };

    let mut store = match management::acquire_for_run(&state.cache) {
        Ok(store) => store,
        Err(e) => return failure(e),
    };

    if let Err(e) = store.reload().await {
        return failure(e.into());
    }

    let client = match management::authorized_client(&state.settings, &mut store).await {
        Ok(client) => client,
        Err(GenerateError::NotAuthorized)
        | Err(GenerateError::Api(ApiError::Unauthorized(_))) => {
            return Redirect::to("/connect").into_response();
        }
        Err(e) => return failure(e),
    };

    let options =
        GenerateOptions::new(replace, seed).playlist_name(state.settings.playlist_name.clone());

    match pipeline::run(&client, &mut store, &options, &mut StdRng::from_os_rng()).await {
        Ok(summary) => {
            success!(
                "Playlist {} updated with {} of {} recommendations",
                summary.sync.playlist_id,
                summary.kept,
                summary.recommended
            );
            (StatusCode::OK, "Playlist saved.").into_response()
        }
        Err(e) => {
            warning!("Problem generating playlist: {}", e);
            failure(e)
        }
    }
}

fn flag(params: &HashMap<String, String>, name: &str) -> Result<bool, String> {
    let value = params.get(name).map(String::as_str).unwrap_or_default();
    utils::parse_flag(value).map_err(|e| format!("{name}: {e}"))
}

fn failure(e: GenerateError) -> Response {
    let status = match e {
        GenerateError::Busy => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, format!("Problem generating playlist: {e}")).into_response()
}
