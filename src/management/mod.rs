mod auth;
mod cache;

pub use auth::TokenManager;
pub use auth::authorized_client;
pub use cache::CACHE_VERSION;
pub use cache::CacheFile;
pub use cache::CacheGuard;
pub use cache::CacheLock;
pub use cache::CacheRecord;
pub use cache::CacheStore;
pub use cache::SharedCache;
pub use cache::acquire_for_run;
