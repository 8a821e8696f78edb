//! HTTP client wrapper for API requests and file downloads.
//!
//! This module provides the `HttpClient` struct which handles buffered and
//! streaming GET requests with proper timeout configuration and error handling.

use std::path::Path;

use futures_util::StreamExt;
use reqwest::{Client, ClientBuilder};
use serde_json::Value;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::FetchError;
use crate::USER_AGENT;

/// HTTP client for fetching API resources.
///
/// This client is designed to be created once and shared across all workers
/// of a batch, taking advantage of connection pooling.
///
/// # Example
///
/// ```no_run
/// use estat_dl_core::download::HttpClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let body = client.get_bytes("https://example.com/data.csv").await?;
/// println!("fetched {} bytes", body.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes (for large CSV pages)
    /// - Gzip decompression: enabled
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .connect_timeout(std::time::Duration::from_secs(connect_timeout_secs))
            .timeout(std::time::Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Sends a GET request and returns the response after status validation.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the URL is invalid, the request fails at the
    /// transport level, or the server responds with a non-success status.
    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        // Validate URL up front so malformed input is reported as such
        // rather than as an opaque transport error.
        Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;

        debug!(url = %url, "HTTP GET");
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::timeout(url)
            } else {
                FetchError::network(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(url, status.as_u16()));
        }

        Ok(response)
    }

    /// Fetches the full response body as bytes.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the request fails, the server returns an
    /// error status, or the body cannot be read.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.get(url).await?;
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::timeout(url)
            } else {
                FetchError::network(url, e)
            }
        })?;
        Ok(body.to_vec())
    }

    /// Fetches a JSON response body and parses it into a `serde_json::Value`.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Decode` when the body is not valid JSON, in
    /// addition to the transport errors of [`get_bytes`](Self::get_bytes).
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let body = self.get_bytes(url).await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::decode(url, e.to_string()))
    }

    /// Streams a response body to a file, byte for byte.
    ///
    /// The destination file is created (truncating any previous content) and
    /// removed again if the transfer fails partway, so a failed item never
    /// leaves a partial file behind.
    ///
    /// # Returns
    ///
    /// The number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the request fails, the server returns an
    /// error status, or writing to disk fails.
    #[instrument(skip(self), fields(url = %url, path = %dest.display()))]
    pub async fn stream_to_file(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let response = self.get(url).await?;

        let file = File::create(dest)
            .await
            .map_err(|e| FetchError::io(dest, e))?;
        let mut writer = BufWriter::new(file);

        let result = copy_stream(response, url, dest, &mut writer).await;
        if result.is_err() {
            debug!(path = %dest.display(), "cleaning up partial file after error");
            let _ = tokio::fs::remove_file(dest).await;
        }
        let bytes_written = result?;

        info!(path = %dest.display(), bytes = bytes_written, "download complete");
        Ok(bytes_written)
    }
}

/// Copies the response body stream into the writer, flushing at the end.
async fn copy_stream(
    response: reqwest::Response,
    url: &str,
    dest: &Path,
    writer: &mut BufWriter<File>,
) -> Result<u64, FetchError> {
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            if e.is_timeout() {
                FetchError::timeout(url)
            } else {
                FetchError::network(url, e)
            }
        })?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| FetchError::io(dest, e))?;
        bytes_written += chunk.len() as u64;
    }

    writer.flush().await.map_err(|e| FetchError::io(dest, e))?;
    Ok(bytes_written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_rejects_invalid_url() {
        let client = HttpClient::new();
        let result = tokio_test::block_on(client.get_bytes("not a url"));
        assert!(matches!(result, Err(FetchError::InvalidUrl { .. })));
    }

    #[test]
    fn test_client_is_cloneable() {
        let client = HttpClient::new();
        let _cloned = client.clone();
    }
}
