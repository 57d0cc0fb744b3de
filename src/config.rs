//! Configuration management for Random Recs.
//!
//! Configuration comes from environment variables, optionally seeded from a
//! `.env` file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)
//!
//! All values are read once into [`Settings`] at startup. A missing required
//! value is a [`ConfigError`] and the binary refuses to start.

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::error::ConfigError;

pub const DEFAULT_PLAYLIST_NAME: &str = "Random Recs";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:9001";
pub const DEFAULT_SCOPE: &str = "playlist-read-private playlist-modify-private user-library-read ugc-image-upload user-read-recently-played";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file is looked up in:
/// - Linux: `~/.local/share/randrecs/.env`
/// - macOS: `~/Library/Application Support/randrecs/.env`
/// - Windows: `%LOCALAPPDATA%/randrecs/.env`
///
/// The directory is created if needed. A missing `.env` is fine, the values
/// may come from the process environment alone; an unparsable one is not.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path)
        .map(|_| ())
        .map_err(|e| format!("Failed to load {}: {}", path.display(), e))
}

/// Directory holding the `.env` file and the default cache location.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("randrecs");
    path
}

/// Runtime settings shared by the server, the CLI and the Spotify client.
#[derive(Debug, Clone)]
pub struct Settings {
    /// `SPOTIFY_API_AUTH_CLIENT_ID`, from the Spotify developer dashboard.
    pub client_id: String,
    /// `SPOTIFY_API_REDIRECT_URI`, must point at this service's `/authorize`.
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub server_addr: String,
    pub cache_path: PathBuf,
    pub template_dir: PathBuf,
    /// Name given to the managed playlist when it has to be created.
    pub playlist_name: String,
    /// Upper bound for a single HTTP request to Spotify.
    pub request_timeout: Duration,
    /// How often a transient failure is retried before giving up.
    pub max_retries: u32,
}

impl Settings {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| value(key).ok_or(ConfigError::Missing(key));
        let or_default = |key: &str, default: &str| value(key).unwrap_or_else(|| default.to_string());

        let timeout_secs: u64 = parse_number(&value, "REQUEST_TIMEOUT_SECS", 30)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "REQUEST_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            client_id: required("SPOTIFY_API_AUTH_CLIENT_ID")?,
            redirect_uri: required("SPOTIFY_API_REDIRECT_URI")?,
            scope: or_default("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE),
            auth_url: or_default("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: or_default("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_url: or_default("SPOTIFY_API_URL", DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            server_addr: or_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            cache_path: value("CACHE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir().join("cache.json")),
            template_dir: PathBuf::from(or_default("TEMPLATE_DIR", "./templates")),
            playlist_name: or_default("PLAYLIST_NAME", DEFAULT_PLAYLIST_NAME),
            request_timeout: Duration::from_secs(timeout_secs),
            max_retries: parse_number(&value, "MAX_RETRIES", 3)?,
        })
    }
}

fn parse_number<T, F>(value: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match value(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}
