use chrono::{DateTime, Utc};
use tabled::Table;

use crate::{
    config::Settings,
    types::{CacheTableRow, Token},
    utils,
};

pub async fn info(settings: Settings) {
    let store = super::open_cache(&settings).await;
    let record = store.record();

    let rows = vec![
        row("Cache file", store.path().display()),
        row("Version", record.version),
        row("Saved albums", record.albums.len()),
        row(
            "Library artists",
            utils::library_artist_ids(&record.albums).len(),
        ),
        row("Recently played", record.recently_played.len()),
        row(
            "Recommendations",
            record
                .recommendations
                .as_ref()
                .map(|r| r.tracks.len().to_string())
                .unwrap_or_else(|| "none".to_string()),
        ),
        row(
            "Playlist",
            record
                .playlist_id
                .clone()
                .unwrap_or_else(|| "not created yet".to_string()),
        ),
        row("Token", token_status(record.token.as_ref())),
        row(
            "Templates",
            record.templates.keys().cloned().collect::<Vec<_>>().join(","),
        ),
    ];

    println!("{}", Table::new(rows));
}

fn row(entry: &str, value: impl std::fmt::Display) -> CacheTableRow {
    CacheTableRow {
        entry: entry.to_string(),
        value: value.to_string(),
    }
}

fn token_status(token: Option<&Token>) -> String {
    let Some(token) = token else {
        return "not connected".to_string();
    };

    let expires_at = (token.obtained_at + token.expires_in) as i64;
    match DateTime::<Utc>::from_timestamp(expires_at, 0) {
        Some(at) if at > Utc::now() => format!("valid until {}", at.format("%Y-%m-%d %H:%M UTC")),
        Some(_) if !token.refresh_token.is_empty() => "expired, refreshed on next use".to_string(),
        _ => "expired".to_string(),
    }
}
