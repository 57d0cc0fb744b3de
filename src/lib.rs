//! Random Recs Library
//!
//! This library builds a recommendation playlist for a Spotify user. It looks at
//! what the user played recently, asks Spotify for recommendations seeded from
//! that history, drops every track whose artists already live in the user's
//! saved albums and writes the rest into a playlist it manages.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local web service
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error types shared by the pipeline and its collaborators
//! - `management` - Persistent cache record and token handling
//! - `pipeline` - Library loading, seed selection, recommendations and playlist sync
//! - `server` - Router setup for the web service
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```no_run
//! use randrecs::{config, management::CacheStore, pipeline};
//!
//! #[tokio::main]
//! async fn main() -> randrecs::Res<()> {
//!     config::load_env().await?;
//!     let settings = config::Settings::from_env()?;
//!     let mut store = CacheStore::open(settings.cache_path.clone()).await?;
//!     let client = randrecs::management::authorized_client(&settings, &mut store).await?;
//!     pipeline::generate(&client, &mut store, true, true).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod pipeline;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used at the binary edge where typed errors from several layers meet.
/// The boxed error keeps Send + Sync bounds for async contexts.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```ignore
/// info!("Getting page {} of albums", page);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```ignore
/// success!("Replaced playlist {}", playlist_id);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal conditions such as a broken configuration or an unreadable
/// cache at startup. Code after this macro does not execute.
///
/// # Example
///
/// ```ignore
/// error!("Missing required environment variable: {}", var_name);
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable problems, e.g. a failed generation run or a cache
/// flush that could not be written after a token exchange.
///
/// # Example
///
/// ```ignore
/// warning!("Error saving cache: {}", err);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
