//! # CLI Module
//!
//! User-facing commands of the `randrecs` binary.
//!
//! - [`serve`] - Runs the web service (`/home`, `/connect`, `/authorize`, `/generate`)
//! - [`auth`] - Connects a Spotify account through the browser
//! - [`generate`] - Runs one playlist generation from the terminal
//! - [`info`] - Shows what the cache currently holds
//! - [`reset`] - Drops cached albums, history or the managed playlist id
//!
//! `generate` and `reset` lock the cache file first and give up when a run
//! elsewhere holds it. Every command opens the cache record first. An unreadable or incompatible
//! cache file is fatal: nothing is served from a record that cannot be trusted.
//!
//! ## Usage Patterns
//!
//! ```bash
//! randrecs auth                     # Connect a Spotify account
//! randrecs generate --replace       # Overwrite the playlist with fresh picks
//! randrecs generate                 # Append fresh picks
//! randrecs reset --albums           # Re-read the library on the next run
//! randrecs serve                    # Serve the web page instead
//! ```

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::Settings,
    error,
    error::GenerateError,
    management::{CacheLock, CacheStore},
};

mod auth;
mod generate;
mod info;
mod reset;
mod serve;

pub use auth::auth;
pub use generate::generate;
pub use info::info;
pub use reset::{ResetTargets, reset};
pub use serve::serve;

async fn open_cache(settings: &Settings) -> CacheStore {
    match CacheStore::open(settings.cache_path.clone()).await {
        Ok(store) => store,
        Err(e) => error!(
            "Cannot load cache {}. Err: {}",
            settings.cache_path.display(),
            e
        ),
    }
}

/// Excludes the server and other CLI runs from the cache until dropped.
fn lock_cache(settings: &Settings) -> CacheLock {
    match CacheLock::try_acquire(&settings.cache_path) {
        Ok(lock) => lock,
        Err(GenerateError::Busy) => {
            error!("The cache is in use by a running generation. Try again later.")
        }
        Err(e) => error!(
            "Cannot lock cache {}. Err: {}",
            settings.cache_path.display(),
            e
        ),
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
