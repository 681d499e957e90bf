//! FileSystemDriver for local ontology and schema documents

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{BiokgError, Result};

/// Local document reader
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemDriver;

impl FileSystemDriver {
    /// Resolve a plain path or `file://` URI to a filesystem path
    ///
    /// # Example
    ///
    /// ```
    /// use biokg_core::drivers::FileSystemDriver;
    /// use std::path::PathBuf;
    ///
    /// assert_eq!(FileSystemDriver::resolve("file:///data/so.owl"), PathBuf::from("/data/so.owl"));
    /// assert_eq!(FileSystemDriver::resolve("data/so.owl"), PathBuf::from("data/so.owl"));
    /// ```
    pub fn resolve(location: &str) -> PathBuf {
        PathBuf::from(location.strip_prefix("file://").unwrap_or(location))
    }

    /// Read the whole document
    pub fn read(location: &str) -> Result<Vec<u8>> {
        let path = Self::resolve(location);
        Self::read_path(&path)
    }

    pub fn read_path(path: &Path) -> Result<Vec<u8>> {
        if !path.exists() {
            return Err(BiokgError::FileNotFound(path.display().to_string()));
        }
        if path.is_dir() {
            return Err(BiokgError::InvalidConfig(format!(
                "Path is a directory: {}",
                path.display()
            )));
        }
        Ok(fs::read(path)?)
    }
}
