//! Single-fetch operations: one source URL into one destination file.
//!
//! Each payload shape gets its own [`Fetch`] implementation:
//!
//! - [`TextFetcher`] - text/CSV read in one encoding, re-encoded into another
//! - [`JsonFetcher`] - parsed and re-serialized with stable indentation,
//!   non-ASCII characters preserved literally
//! - [`BinaryFetcher`] - byte-for-byte passthrough (spreadsheet/zip payloads)
//!
//! The bulk fetch engine dispatches through `Arc<dyn Fetch>`, so test code
//! can substitute instrumented stubs without touching HTTP.

use std::path::Path;

use async_trait::async_trait;

use super::client::HttpClient;
use super::encoding::Transcoding;
use super::error::FetchError;

/// A single fetch-and-persist operation.
///
/// Implementations must be safe to invoke concurrently from multiple
/// workers; they hold no mutable state of their own and share the HTTP
/// client's connection pool.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetches `source` and persists the payload at `dest`.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` describing the transport, decode, or
    /// filesystem failure. The caller treats any error as a terminal
    /// per-item outcome.
    async fn fetch(&self, source: &str, dest: &Path) -> Result<(), FetchError>;
}

/// Fetches a text resource, transcoding between server and disk encodings.
#[derive(Debug, Clone)]
pub struct TextFetcher {
    client: HttpClient,
    transcoding: Transcoding,
}

impl TextFetcher {
    /// Creates a text fetcher with the given transcoding pair.
    #[must_use]
    pub fn new(client: HttpClient, transcoding: Transcoding) -> Self {
        Self {
            client,
            transcoding,
        }
    }
}

#[async_trait]
impl Fetch for TextFetcher {
    async fn fetch(&self, source: &str, dest: &Path) -> Result<(), FetchError> {
        let body = self.client.get_bytes(source).await?;
        let encoded = self.transcoding.transcode(source, &body)?;
        tokio::fs::write(dest, encoded)
            .await
            .map_err(|e| FetchError::io(dest, e))
    }
}

/// Fetches a JSON resource and persists it pretty-printed.
///
/// The body is parsed and re-serialized with 2-space indentation.
/// Non-ASCII characters stay literal rather than `\u`-escaped, so
/// Japanese table names remain readable in the saved file.
#[derive(Debug, Clone)]
pub struct JsonFetcher {
    client: HttpClient,
}

impl JsonFetcher {
    /// Creates a JSON fetcher.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetch for JsonFetcher {
    async fn fetch(&self, source: &str, dest: &Path) -> Result<(), FetchError> {
        let value = self.client.get_json(source).await?;
        let pretty = serde_json::to_string_pretty(&value)
            .map_err(|e| FetchError::decode(source, e.to_string()))?;
        tokio::fs::write(dest, pretty)
            .await
            .map_err(|e| FetchError::io(dest, e))
    }
}

/// Fetches a binary resource with streaming passthrough.
#[derive(Debug, Clone)]
pub struct BinaryFetcher {
    client: HttpClient,
}

impl BinaryFetcher {
    /// Creates a binary fetcher.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetch for BinaryFetcher {
    async fn fetch(&self, source: &str, dest: &Path) -> Result<(), FetchError> {
        self.client.stream_to_file(source, dest).await.map(|_| ())
    }
}
