use chrono::Utc;
use reqwest::{Client, Url};

use crate::{
    config::Settings,
    error::ApiError,
    types::{Token, TokenResponse},
};

/// Builds the Spotify authorization URL for the PKCE flow.
///
/// The user is sent here by `/connect`; Spotify redirects back to the
/// configured redirect URI with `code` and the same `state`.
pub fn authorize_url(settings: &Settings, code_challenge: &str, state: &str) -> Result<Url, ApiError> {
    Url::parse_with_params(
        &settings.auth_url,
        &[
            ("client_id", settings.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", settings.redirect_uri.as_str()),
            ("code_challenge_method", "S256"),
            ("code_challenge", code_challenge),
            ("scope", settings.scope.as_str()),
            ("state", state),
        ],
    )
    .map_err(|e| ApiError::Decode(format!("invalid authorization url: {e}")))
}

/// Exchanges an authorization code for a token, proving possession of `verifier`.
pub async fn exchange_code_pkce(
    settings: &Settings,
    code: &str,
    verifier: &str,
) -> Result<Token, ApiError> {
    let params = [
        ("grant_type", "authorization_code"),
        ("client_id", settings.client_id.as_str()),
        ("code", code),
        ("code_verifier", verifier),
        ("redirect_uri", settings.redirect_uri.as_str()),
    ];

    let response = request_token(settings, &params).await?;
    Ok(into_token(response, None))
}

/// Exchanges a refresh token for a new access token.
///
/// Spotify may omit a new refresh token; the previous one is kept then.
pub async fn refresh_token(settings: &Settings, refresh_token: &str) -> Result<Token, ApiError> {
    let params = [
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("client_id", settings.client_id.as_str()),
    ];

    let response = request_token(settings, &params).await?;
    Ok(into_token(response, Some(refresh_token)))
}

async fn request_token(
    settings: &Settings,
    params: &[(&str, &str)],
) -> Result<TokenResponse, ApiError> {
    let client = Client::builder().timeout(settings.request_timeout).build()?;
    let res = client.post(&settings.token_url).form(params).send().await?;

    let status = res.status();
    let body = res.text().await?;
    if !status.is_success() {
        return Err(ApiError::Unauthorized(format!(
            "token endpoint returned {}: {}",
            status.as_u16(),
            body
        )));
    }

    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Turns a token endpoint response into a stored [`Token`].
pub fn into_token(response: TokenResponse, previous_refresh: Option<&str>) -> Token {
    Token {
        access_token: response.access_token,
        refresh_token: response
            .refresh_token
            .filter(|t| !t.is_empty())
            .or_else(|| previous_refresh.map(str::to_string))
            .unwrap_or_default(),
        scope: response.scope.unwrap_or_default(),
        expires_in: response.expires_in.unwrap_or(3600),
        obtained_at: Utc::now().timestamp() as u64,
    }
}
