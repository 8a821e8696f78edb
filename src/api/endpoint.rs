//! Request URL construction.
//!
//! Endpoints follow the shape `{base}/{version}/app/{segment}{name}`:
//! JSON responses route through a `json/` path segment, JSONP through
//! `jsonp/`, while XML and CSV use the bare `app/` path. CSV additionally
//! selects the `getSimple*` variant of the operation name.

use url::Url;

use super::config::ApiConfig;
use super::error::ApiError;
use super::params::QueryParams;

/// API operations exposed by this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Table listing search (`getStatsList`).
    StatsList,
    /// Metadata for one table (`getMetaInfo`).
    MetaInfo,
    /// Statistical data rows for one table (`getStatsData`).
    StatsData,
}

impl Operation {
    /// Operation name for XML/JSON/JSONP responses.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::StatsList => "getStatsList",
            Self::MetaInfo => "getMetaInfo",
            Self::StatsData => "getStatsData",
        }
    }

    /// Operation name for CSV responses.
    #[must_use]
    pub fn simple_name(self) -> &'static str {
        match self {
            Self::StatsList => "getSimpleStatsList",
            Self::MetaInfo => "getSimpleMetaInfo",
            Self::StatsData => "getSimpleStatsData",
        }
    }
}

/// Target response formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Raw XML.
    Xml,
    /// JSON.
    Json,
    /// JSON wrapped in a caller-supplied callback (requires a `callback`
    /// query parameter).
    JsonCallback,
    /// CSV via the `getSimple*` endpoints.
    Csv,
}

impl ResponseFormat {
    /// Extra path segment between `app/` and the operation name.
    #[must_use]
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Xml | Self::Csv => "",
            Self::Json => "json/",
            Self::JsonCallback => "jsonp/",
        }
    }
}

/// Builds a fully encoded request URL.
///
/// # Errors
///
/// Returns [`ApiError::BaseUrl`] when the configured base URL does not
/// parse as an absolute URL.
pub fn build_url(
    config: &ApiConfig,
    op: Operation,
    format: ResponseFormat,
    params: &QueryParams,
) -> Result<Url, ApiError> {
    let name = match format {
        ResponseFormat::Csv => op.simple_name(),
        _ => op.name(),
    };
    let endpoint = format!(
        "{}/{}/app/{}{}",
        config.base_url,
        config.version,
        format.path_segment(),
        name
    );

    let mut url = Url::parse(&endpoint).map_err(|source| ApiError::BaseUrl {
        url: endpoint.clone(),
        source,
    })?;
    // An empty serializer still leaves a trailing "?" behind, so only
    // touch the query when there is something to write.
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params.iter());
    }
    Ok(url)
}
