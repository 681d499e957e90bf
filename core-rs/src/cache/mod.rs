//! Cache module for hybridization results
//!
//! A hybrid ontology is expensive to rebuild (remote downloads, RDF parsing),
//! so the result is stored under a SHA-256 key of everything that went into
//! it. Caches are handed to the hybridizer explicitly; there is no global
//! instance.
//!
//! - FileCache: one JSON document per key in a directory
//! - MemoryCache: process-local map, for tests and embedding

mod file;

pub use file::FileCache;

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::{BiokgError, Result};
use crate::hybrid::HybridOntology;

/// A stored hybridization result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedOntology {
    pub key: String,
    pub created_at: DateTime<Utc>,
    pub crate_version: String,
    pub ontology: HybridOntology,
}

impl CachedOntology {
    pub fn new(key: impl Into<String>, ontology: HybridOntology) -> Self {
        Self {
            key: key.into(),
            created_at: Utc::now(),
            crate_version: crate::VERSION.to_string(),
            ontology,
        }
    }
}

/// Storage for hybridization results
pub trait OntologyCache: Send + Sync {
    /// `Ok(None)` on a miss
    fn load(&self, key: &str) -> Result<Option<CachedOntology>>;

    fn save(&self, key: &str, value: &CachedOntology) -> Result<()>;
}

/// Hex SHA-256 of the JSON form of `inputs`, salted with the crate version
///
/// # Example
/// ```
/// use biokg_core::cache::cache_key;
///
/// let a = cache_key(&("entity", 1)).unwrap();
/// let b = cache_key(&("entity", 1)).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 64);
/// ```
pub fn cache_key<T: Serialize + ?Sized>(inputs: &T) -> Result<String> {
    let payload = serde_json::to_vec(inputs)?;
    let mut hasher = Sha256::new();
    hasher.update(crate::VERSION.as_bytes());
    hasher.update(&payload);
    Ok(hex::encode(hasher.finalize()))
}

/// In-memory cache
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CachedOntology>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OntologyCache for MemoryCache {
    fn load(&self, key: &str) -> Result<Option<CachedOntology>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| BiokgError::Cache(format!("memory cache poisoned: {}", e)))?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &CachedOntology) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| BiokgError::Cache(format!("memory cache poisoned: {}", e)))?;
        entries.insert(key.to_string(), value.clone());
        Ok(())
    }
}
