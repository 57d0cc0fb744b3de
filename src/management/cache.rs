use std::{
    collections::BTreeMap,
    fs::{self, File, OpenOptions},
    io::{self, ErrorKind},
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
    sync::Arc,
};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    error::{CacheError, GenerateError},
    types::{Recommendations, RecentlyPlayedItem, SavedAlbum, Token},
};

/// Bumped whenever the layout of [`CacheRecord`] changes incompatibly.
pub const CACHE_VERSION: u32 = 1;

/// Everything the service remembers between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub version: u32,
    /// Rendered HTML pages by template name.
    #[serde(default)]
    pub templates: BTreeMap<String, String>,
    #[serde(default)]
    pub recently_played: Vec<RecentlyPlayedItem>,
    #[serde(default)]
    pub recommendations: Option<Recommendations>,
    #[serde(default)]
    pub token: Option<Token>,
    #[serde(default)]
    pub albums: Vec<SavedAlbum>,
    #[serde(default)]
    pub playlist_id: Option<String>,
}

impl Default for CacheRecord {
    fn default() -> Self {
        Self {
            version: CACHE_VERSION,
            templates: BTreeMap::new(),
            recently_played: Vec::new(),
            recommendations: None,
            token: None,
            albums: Vec::new(),
            playlist_id: None,
        }
    }
}

/// The JSON file backing a [`CacheRecord`].
#[derive(Debug, Clone)]
pub struct CacheFile {
    path: PathBuf,
}

impl CacheFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Reads the record. A missing or empty file yields an empty record.
    pub async fn load(&self) -> Result<CacheRecord, CacheError> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(CacheRecord::default()),
            Err(e) => return Err(CacheError::Io(e)),
        };

        if content.trim().is_empty() {
            return Ok(CacheRecord::default());
        }

        let value: serde_json::Value =
            serde_json::from_str(&content).map_err(CacheError::Corrupt)?;
        let found = value.get("version").and_then(|v| v.as_u64());
        if found != Some(CACHE_VERSION as u64) {
            return Err(CacheError::UnsupportedVersion {
                found,
                expected: CACHE_VERSION,
            });
        }

        serde_json::from_value(value).map_err(CacheError::Corrupt)
    }

    /// Writes the record to a sibling temp file and renames it into place,
    /// so a crash mid-write leaves the previous record intact.
    pub async fn save(&self, record: &CacheRecord) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(record).map_err(CacheError::Serialize)?;
        let tmp_path = self.tmp_path();
        async_fs::write(&tmp_path, json).await?;
        if let Err(e) = async_fs::rename(&tmp_path, &self.path).await {
            let _ = async_fs::remove_file(&tmp_path).await;
            return Err(CacheError::Io(e));
        }
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "cache".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// The in-memory cache record together with the file it is flushed to.
#[derive(Debug)]
pub struct CacheStore {
    file: CacheFile,
    record: CacheRecord,
}

/// Process-wide handle to the cache. Whoever holds the lock owns the record.
pub type SharedCache = Arc<Mutex<CacheStore>>;

impl CacheStore {
    /// Loads the record at `path`, or starts empty when there is none yet.
    pub async fn open(path: PathBuf) -> Result<Self, CacheError> {
        let file = CacheFile::new(path);
        let record = file.load().await?;
        Ok(Self { file, record })
    }

    /// A store that starts from `record` without touching the file.
    pub fn with_record(path: PathBuf, record: CacheRecord) -> Self {
        Self {
            file: CacheFile::new(path),
            record,
        }
    }

    pub fn shared(self) -> SharedCache {
        Arc::new(Mutex::new(self))
    }

    /// Replaces the in-memory record with what is on disk.
    pub async fn reload(&mut self) -> Result<(), CacheError> {
        self.record = self.file.load().await?;
        Ok(())
    }

    pub async fn flush(&self) -> Result<(), CacheError> {
        self.file.save(&self.record).await
    }

    pub fn record(&self) -> &CacheRecord {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut CacheRecord {
        &mut self.record
    }

    pub fn path(&self) -> &PathBuf {
        self.file.path()
    }
}

/// Exclusive lock on `<cache file>.lock`, shared by every process using the
/// same cache file. Released when dropped.
#[derive(Debug)]
pub struct CacheLock {
    file: File,
}

impl CacheLock {
    pub fn lock_path(cache_path: &Path) -> PathBuf {
        let mut name = cache_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "cache".into());
        name.push(".lock");
        cache_path.with_file_name(name)
    }

    /// Takes the lock, or fails with [`GenerateError::Busy`] when another
    /// writer holds it.
    pub fn try_acquire(cache_path: &Path) -> Result<Self, GenerateError> {
        let file = open_lock_file(cache_path)?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self { file }),
            Err(e) if is_contended(&e) => Err(GenerateError::Busy),
            Err(e) => Err(CacheError::Io(e).into()),
        }
    }

    /// Waits until the lock is free.
    pub async fn acquire(cache_path: &Path) -> Result<Self, CacheError> {
        let file = open_lock_file(cache_path)?;
        let file = tokio::task::spawn_blocking(move || file.lock_exclusive().map(|_| file))
            .await
            .map_err(io::Error::other)??;
        Ok(Self { file })
    }
}

impl Drop for CacheLock {
    fn drop(&mut self) {
        // the lock file itself stays, removing it would race with waiters
        let _ = FileExt::unlock(&self.file);
    }
}

fn open_lock_file(cache_path: &Path) -> Result<File, CacheError> {
    let lock_path = CacheLock::lock_path(cache_path);
    if let Some(parent) = lock_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    Ok(OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)?)
}

fn is_contended(e: &io::Error) -> bool {
    e.kind() == ErrorKind::WouldBlock
        || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

/// Exclusive access to the cache record: the in-process [`SharedCache`] lock
/// plus the [`CacheLock`] file lock.
#[derive(Debug)]
pub struct CacheGuard {
    store: OwnedMutexGuard<CacheStore>,
    _lock: CacheLock,
}

impl CacheGuard {
    /// Takes the cache without waiting, or reports that another writer has it.
    pub fn try_acquire(cache: &SharedCache) -> Result<Self, GenerateError> {
        let store = Arc::clone(cache)
            .try_lock_owned()
            .map_err(|_| GenerateError::Busy)?;
        let lock = CacheLock::try_acquire(store.path())?;
        Ok(Self { store, _lock: lock })
    }

    /// Waits for the in-process lock first, then for the file lock.
    pub async fn acquire(cache: &SharedCache) -> Result<Self, CacheError> {
        let store = Arc::clone(cache).lock_owned().await;
        let lock = CacheLock::acquire(store.path()).await?;
        Ok(Self { store, _lock: lock })
    }
}

impl Deref for CacheGuard {
    type Target = CacheStore;

    fn deref(&self) -> &CacheStore {
        &self.store
    }
}

impl DerefMut for CacheGuard {
    fn deref_mut(&mut self) -> &mut CacheStore {
        &mut self.store
    }
}

/// Takes the cache for a whole generation run, or reports that one is running.
pub fn acquire_for_run(cache: &SharedCache) -> Result<CacheGuard, GenerateError> {
    CacheGuard::try_acquire(cache)
}
