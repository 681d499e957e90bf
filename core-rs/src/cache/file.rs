//! FileCache: one JSON file per key
//!
//! No cross-process locking: two processes populating the same directory may
//! overwrite each other's entry. Unreadable or stale entries count as misses.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{CachedOntology, OntologyCache};
use crate::errors::{BiokgError, Result};

#[derive(Debug, Clone)]
pub struct FileCache {
    cache_dir: PathBuf,
}

impl FileCache {
    /// Create the cache, creating the directory if needed
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();
        if !cache_dir.exists() {
            fs::create_dir_all(&cache_dir).map_err(|e| {
                BiokgError::Cache(format!(
                    "Failed to create cache directory {}: {}",
                    cache_dir.display(),
                    e
                ))
            })?;
        }
        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }
}

impl OntologyCache for FileCache {
    fn load(&self, key: &str) -> Result<Option<CachedOntology>> {
        let path = self.entry_path(key);
        if !path.exists() {
            debug!(path = %path.display(), "cache miss");
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        match serde_json::from_str::<CachedOntology>(&content) {
            Ok(entry) if entry.key == key && entry.crate_version == crate::VERSION => Ok(Some(entry)),
            Ok(_) => {
                warn!(path = %path.display(), "stale cache entry, ignoring");
                Ok(None)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt cache entry, ignoring");
                Ok(None)
            }
        }
    }

    fn save(&self, key: &str, value: &CachedOntology) -> Result<()> {
        let path = self.entry_path(key);
        let content = serde_json::to_string(value)?;
        fs::write(&path, content).map_err(|e| {
            BiokgError::Cache(format!("Failed to write {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "cache entry written");
        Ok(())
    }
}
