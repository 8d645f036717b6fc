use crate::core::errors::{Error, Result};
use chrono::{DateTime, Utc};
use log::{error, info};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

/*-------------------------------------------------------------------------------------------------
  Response Cache
-------------------------------------------------------------------------------------------------*/

/// Disk-backed store for raw inventory API payloads. Each cache key maps to a single
/// pretty-printed JSON file, `{cache_dir}/{key}.json`, and the file's last-modified time
/// decides whether the payload is still fresh.
///
/// The cache is TTL-agnostic; callers choose the TTL on every lookup.
///
/// ```
/// # let dir = tempfile::tempdir().unwrap();
/// let cache = chinventory::ResponseCache::new(dir.path());
/// let payload = cache.get_or_fetch("AwsVpc", 3600, || Ok(serde_json::json!([])))?;
/// assert!(payload.is_array());
/// # Ok::<(), chinventory::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ResponseCache {
    cache_dir: PathBuf,
}

/// Freshness report for an existing cache artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStatus {
    pub path: PathBuf,
    pub modified: DateTime<Utc>,
    pub age: Duration,
    pub fresh: bool,
}

impl ResponseCache {
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Self {
        Self {
            cache_dir: cache_dir.as_ref().to_path_buf(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path of the artifact backing `key`.
    pub fn cache_file(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{key}.json"))
    }

    /// Path of the artifact backing `key`, refusing keys that would resolve outside the
    /// cache directory.
    fn artifact(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.contains("..") {
            return Err(Error::MalformedPayload(format!("invalid cache key {key:?}")));
        }
        Ok(self.cache_file(key))
    }

    /*-------------------------------------------------------------------------
      Get or Fetch
    -------------------------------------------------------------------------*/

    /// Return the stored payload for `key` when its age is strictly less than
    /// `ttl_seconds`; otherwise call `fetch` once, overwrite the artifact with its
    /// result, and return it.
    ///
    /// A failed `fetch` is returned as-is and leaves any existing artifact untouched.
    pub fn get_or_fetch<F>(&self, key: &str, ttl_seconds: u64, fetch: F) -> Result<Value>
    where
        F: FnOnce() -> Result<Value>,
    {
        let path = self.artifact(key)?;

        match self.age(&path)? {
            Some(age) if age < Duration::from_secs(ttl_seconds) => {
                info!("Cache file is fresh; using cached result from {:?}", &path);
                return self.read(&path);
            }
            Some(_) => info!("Cache file {:?} is stale; refresh cache", &path),
            None => info!("Cache file {:?} not found", &path),
        }

        let payload = fetch()?;
        self.write(&path, &payload)?;
        Ok(payload)
    }

    /*-------------------------------------------------------------------------
      Status
    -------------------------------------------------------------------------*/

    /// Report the last-modified time, age, and freshness of the artifact for `key`,
    /// or `None` when nothing has been cached yet.
    pub fn status(&self, key: &str, ttl_seconds: u64) -> Result<Option<CacheStatus>> {
        let path = self.artifact(key)?;
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(Error::CacheIo { path, source }),
        };
        let modified = metadata.modified().map_err(|source| Error::CacheIo {
            path: path.clone(),
            source,
        })?;

        // A timestamp in the future counts as age zero.
        let age = modified.elapsed().unwrap_or_default();

        Ok(Some(CacheStatus {
            path,
            modified: DateTime::<Utc>::from(modified),
            age,
            fresh: age < Duration::from_secs(ttl_seconds),
        }))
    }

    /*-------------------------------------------------------------------------
      Private Methods
    -------------------------------------------------------------------------*/

    fn age(&self, path: &Path) -> Result<Option<Duration>> {
        match fs::metadata(path).and_then(|metadata| metadata.modified()) {
            Ok(modified) => Ok(Some(modified.elapsed().unwrap_or_default())),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(Error::CacheIo {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn read(&self, path: &Path) -> Result<Value> {
        let json = fs::read_to_string(path).map_err(|source| Error::CacheIo {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&json)
            .map_err(|source| Error::CacheDecode {
                path: path.to_path_buf(),
                source,
            })
            .inspect_err(|error| error!("Failed to read cached payload: {}", error))
    }

    fn write(&self, path: &Path, payload: &Value) -> Result<()> {
        let json = serde_json::to_string_pretty(payload)?;

        fs::create_dir_all(&self.cache_dir)
            .and_then(|_| fs::write(path, json))
            .inspect(|_| info!("Saved result to cache {:?}", path))
            .map_err(|source| Error::CacheIo {
                path: path.to_path_buf(),
                source,
            })
            .inspect_err(|error| error!("Failed to save result to cache: {}", error))
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
