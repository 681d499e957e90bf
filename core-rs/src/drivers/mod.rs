//! Drivers module for document retrieval
//!
//! Ontology documents and schema configurations are referenced by location:
//! - FileSystemDriver: local paths and `file://` URIs
//! - HttpDriver: `http://` / `https://` URLs (blocking, no retries)

mod filesystem;
mod http;

pub use filesystem::FileSystemDriver;
pub use http::HttpDriver;

use crate::errors::Result;

/// True for locations that must be fetched over the network
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Read a document from a local path, `file://` URI, or `http(s)://` URL
pub fn fetch_document(location: &str) -> Result<Vec<u8>> {
    if is_remote(location) {
        HttpDriver::new()?.fetch(location)
    } else {
        FileSystemDriver::read(location)
    }
}
