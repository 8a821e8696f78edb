//! HTTP fetch operations and the concurrent bulk-fetch engine.
//!
//! This module provides the machinery for retrieving many API resources
//! concurrently to local storage.
//!
//! # Features
//!
//! - Bounded-concurrency batch execution with per-item failure isolation
//! - Fetch variants per payload shape (text with charset transcoding,
//!   pretty-printed JSON, raw binary streaming)
//! - Configurable timeouts (30s connect, 5min read by default)
//! - Structured error types with full context
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use estat_dl_core::download::{BulkFetchEngine, HttpClient, TextFetcher, Transcoding, WorkBatch};
//! use estat_dl_core::progress::BatchProgress;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let batch = WorkBatch::from_pairs(
//!     vec!["https://example.com/a.csv".to_string()],
//!     vec!["./downloads/a.csv".into()],
//! )?;
//! let fetcher = Arc::new(TextFetcher::new(HttpClient::new(), Transcoding::utf8()));
//! let engine = BulkFetchEngine::new(10)?;
//! let progress = BatchProgress::new(batch.len() as u64);
//! let stats = engine.run_batch(batch, fetcher, &progress).await?;
//! println!("completed {} of {}", stats.completed(), stats.total());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod encoding;
mod engine;
mod error;
mod fetchers;

pub use client::HttpClient;
pub use constants::{CONNECT_TIMEOUT_SECS, DEFAULT_CONCURRENCY, READ_TIMEOUT_SECS};
pub use encoding::Transcoding;
pub use engine::{BatchFailure, BatchStats, BulkFetchEngine, EngineError, WorkBatch, WorkItem};
pub use error::FetchError;
pub use fetchers::{BinaryFetcher, Fetch, JsonFetcher, TextFetcher};

// Note: no module-local Result aliases. Use `Result<T, FetchError>`
// explicitly in function signatures.
