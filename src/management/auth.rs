use chrono::Utc;

use crate::{
    config::Settings,
    error::{ApiError, GenerateError},
    management::CacheStore,
    spotify::{SpotifyClient, auth},
    types::Token,
};

/// Seconds before the real expiry at which a token counts as expired.
const EXPIRY_MARGIN_SECS: u64 = 240;

pub struct TokenManager {
    token: Token,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager { token }
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now >= (self.token.obtained_at + self.token.expires_in).saturating_sub(EXPIRY_MARGIN_SECS)
    }

    /// Refreshes the token if it is about to expire. Returns whether it did.
    pub async fn ensure_fresh(&mut self, settings: &Settings) -> Result<bool, ApiError> {
        if !self.is_expired() {
            return Ok(false);
        }
        if self.token.refresh_token.is_empty() {
            return Err(ApiError::Unauthorized(
                "token expired and no refresh token is stored".to_string(),
            ));
        }

        self.token = auth::refresh_token(settings, &self.token.refresh_token).await?;
        Ok(true)
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }

    pub fn into_token(self) -> Token {
        self.token
    }
}

/// Builds a client from the cached token, refreshing and persisting it first
/// when it is about to expire.
pub async fn authorized_client(
    settings: &Settings,
    store: &mut CacheStore,
) -> Result<SpotifyClient, GenerateError> {
    let token = store
        .record()
        .token
        .clone()
        .ok_or(GenerateError::NotAuthorized)?;

    let mut token_mgr = TokenManager::new(token);
    if token_mgr.ensure_fresh(settings).await? {
        store.record_mut().token = Some(token_mgr.current_token().clone());
        store.flush().await?;
    }

    let access_token = token_mgr.into_token().access_token;
    Ok(SpotifyClient::new(settings, access_token)?)
}
