use axum::{
    Extension,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::{server::AppState, spotify::auth, types::PkceToken, utils};

pub async fn connect(Extension(state): Extension<AppState>) -> Response {
    // generate PKCE verifier and challenge
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);
    let csrf_state = utils::generate_state();

    let url = match auth::authorize_url(&state.settings, &code_challenge, &csrf_state) {
        Ok(url) => url,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Couldn't build authorization url: {e}"),
            )
                .into_response();
        }
    };

    // store verifier before redirect
    *state.pkce.lock().await = Some(PkceToken {
        code_verifier,
        state: csrf_state,
    });

    Redirect::to(url.as_str()).into_response()
}
