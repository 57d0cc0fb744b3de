use thiserror::Error;

/// Problems with the process configuration. Always fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Failures reading or writing the persisted cache record.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache file is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("cannot serialize cache: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("cache version {found:?} is not supported (expected {expected})")]
    UnsupportedVersion { found: Option<u64>, expected: u32 },
}

/// Failures talking to the Spotify Web API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("not authorized: {0}")]
    Unauthorized(String),

    #[error("rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    #[error("spotify returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether a later attempt of the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Http(e) => e.is_connect() || e.is_timeout(),
            ApiError::Timeout | ApiError::RateLimited { .. } => true,
            ApiError::Status { status, .. } => is_retryable_status(*status),
            ApiError::Unauthorized(_) | ApiError::Decode(_) => false,
        }
    }
}

/// Gateway and availability errors that usually clear up on their own.
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 502 | 503 | 504)
}

/// Reasons a generation run fails.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("no recently played tracks to seed recommendations from")]
    EmptyHistory,

    #[error(
        "generating without history-based seeding is not supported; request generation with seed=true"
    )]
    HistorySeedingDisabled,

    #[error("a playlist generation is already running")]
    Busy,

    #[error("no Spotify token in cache, connect an account first")]
    NotAuthorized,
}
