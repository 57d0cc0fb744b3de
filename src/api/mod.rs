//! # API Module
//!
//! HTTP handlers of the local web service.
//!
//! ## Endpoints
//!
//! - [`home`] - Landing page with the generate form. The rendered template is
//!   cached in the cache record after the first read.
//! - [`connect`] - Starts the Spotify OAuth 2.0 PKCE flow.
//! - [`authorize`] - OAuth callback. Exchanges the code and stores the token in
//!   the cache record.
//! - [`generate`] - Runs the generation pipeline, `?replace=<bool>&seed=<bool>`.
//! - [`health`] - Status and version for monitoring.
//!
//! All handlers receive the shared [`crate::server::AppState`] through an
//! axum `Extension`.

mod authorize;
mod connect;
mod generate;
mod health;
mod home;

pub use authorize::authorize;
pub use connect::connect;
pub use generate::generate;
pub use health::health;
pub use home::home;
