//! HttpDriver for remote ontology documents and schema configurations
//!
//! Blocking and single-shot: a transport failure is reported once, naming
//! the URL, and never retried.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::info;

use crate::errors::{BiokgError, Result};

const USER_AGENT: &str = concat!("biokg-core-rs/", env!("CARGO_PKG_VERSION"));
const TIMEOUT_SECS: u64 = 120;

/// HTTP driver for document downloads
#[derive(Debug, Clone)]
pub struct HttpDriver {
    client: Client,
}

impl HttpDriver {
    /// Create new HttpDriver
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(|e| BiokgError::Http {
                url: String::new(),
                reason: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }

    /// Download a document
    pub fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        info!(url, "fetching remote document");

        let response = self.client.get(url).send().map_err(|e| BiokgError::Http {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        Self::handle_status_code(url, response.status().as_u16())?;

        let body = response.bytes().map_err(|e| BiokgError::Http {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(body.to_vec())
    }

    /// Map a response status to a result
    ///
    /// # Example
    ///
    /// ```
    /// use biokg_core::drivers::HttpDriver;
    ///
    /// assert!(HttpDriver::handle_status_code("https://example.org/so.owl", 200).is_ok());
    /// assert!(HttpDriver::handle_status_code("https://example.org/so.owl", 404).is_err());
    /// ```
    pub fn handle_status_code(url: &str, status_code: u16) -> Result<()> {
        let reason = match status_code {
            200..=299 => return Ok(()),
            404 => "resource not found".to_string(),
            500..=599 => format!("server error ({})", status_code),
            _ => format!("unexpected status code: {}", status_code),
        };
        Err(BiokgError::Http {
            url: url.to_string(),
            reason,
        })
    }
}
