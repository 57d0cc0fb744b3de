use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tokio::time::sleep;

use super::SpotifyApi;
use crate::{
    config::Settings,
    error::{ApiError, is_retryable_status},
    types::{
        CurrentUser, ErrorEnvelope, Playlist, RecentlyPlayedItem, RecommendationParams,
        Recommendations, SavedAlbum, Seeds,
    },
    warning,
};

/// Longest `Retry-After` we are willing to sleep through.
const MAX_RETRY_AFTER_SECS: u64 = 120;

/// Authenticated Spotify Web API client.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    base_url: String,
    access_token: String,
    max_retries: u32,
}

impl SpotifyClient {
    pub fn new(settings: &Settings, access_token: String) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(settings.request_timeout).build()?;
        Ok(Self {
            http,
            base_url: settings.api_url.clone(),
            access_token,
            max_retries: settings.max_retries,
        })
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request built by `build`, retrying transient failures.
    ///
    /// `build` is called once per attempt since a sent request is consumed.
    pub(super) async fn execute<F>(&self, build: F) -> Result<Response, ApiError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let can_retry = attempt <= self.max_retries;

            let response = match build(&self.http)
                .bearer_auth(&self.access_token)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(err) => {
                    if (err.is_connect() || err.is_timeout()) && can_retry {
                        sleep(backoff(attempt)).await;
                        continue; // retry
                    }
                    if err.is_timeout() {
                        return Err(ApiError::Timeout);
                    }
                    return Err(ApiError::Http(err));
                }
            };

            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            match status {
                StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after = response
                        .headers()
                        .get("retry-after")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok())
                        .unwrap_or(1);
                    if can_retry && retry_after <= MAX_RETRY_AFTER_SECS {
                        sleep(Duration::from_secs(retry_after)).await;
                        continue;
                    }
                    if retry_after > MAX_RETRY_AFTER_SECS {
                        warning!(
                            "Retry after has reached an abnormal high of {} seconds.",
                            retry_after
                        );
                    }
                    return Err(ApiError::RateLimited { retry_after });
                }
                _ if can_retry && is_retryable_status(status.as_u16()) => {
                    sleep(backoff(attempt)).await;
                    continue;
                }
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    return Err(ApiError::Unauthorized(error_message(response).await));
                }
                _ => {
                    return Err(ApiError::Status {
                        status: status.as_u16(),
                        message: error_message(response).await,
                    });
                }
            }
        }
    }
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(500 * 2u64.pow(attempt.saturating_sub(1).min(5)))
}

/// Pulls `error.message` out of a Spotify error body, falling back to the raw text.
async fn error_message(response: Response) -> String {
    let body = response.text().await.unwrap_or_default();
    serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message)
        .unwrap_or(body)
}

pub(super) async fn decode<T: serde::de::DeserializeOwned>(
    response: Response,
) -> Result<T, ApiError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl SpotifyApi for SpotifyClient {
    async fn current_user(&self) -> Result<CurrentUser, ApiError> {
        self.get_current_user().await
    }

    async fn current_user_playlists(&self) -> Result<Vec<Playlist>, ApiError> {
        self.get_current_user_playlists().await
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        public: bool,
    ) -> Result<Playlist, ApiError> {
        self.create_user_playlist(user_id, name, public).await
    }

    async fn replace_playlist_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), ApiError> {
        self.put_playlist_tracks(playlist_id, track_ids).await
    }

    async fn add_tracks_to_playlist(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<Option<String>, ApiError> {
        self.post_playlist_tracks(playlist_id, track_ids).await
    }

    async fn saved_albums(&self, limit: u32, offset: u32) -> Result<Vec<SavedAlbum>, ApiError> {
        self.get_saved_albums(limit, offset).await
    }

    async fn recently_played(&self, limit: u32) -> Result<Vec<RecentlyPlayedItem>, ApiError> {
        self.get_recently_played(limit).await
    }

    async fn recommendations(
        &self,
        seeds: &Seeds,
        params: &RecommendationParams,
    ) -> Result<Recommendations, ApiError> {
        self.get_recommendations(seeds, params).await
    }
}
