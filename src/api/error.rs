//! Error types for the API module.

use thiserror::Error;

/// Errors from request construction and listing interpretation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL cannot be parsed.
    #[error("invalid base URL {url}: {source}")]
    BaseUrl {
        /// The offending base URL string.
        url: String,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// Page size must be a positive number of rows.
    #[error("invalid page size: must be at least 1 row")]
    InvalidPageSize,

    /// The listing response did not have the expected shape.
    #[error("unexpected listing response: {detail}")]
    Listing {
        /// What was missing or malformed.
        detail: String,
    },
}

impl ApiError {
    /// Creates a listing shape error.
    pub fn listing(detail: impl Into<String>) -> Self {
        Self::Listing {
            detail: detail.into(),
        }
    }
}
