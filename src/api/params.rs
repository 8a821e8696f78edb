//! Ordered query parameter maps for API requests.

use super::config::ApiConfig;
use super::paging::Page;

/// An ordered collection of query parameters.
///
/// Keys keep their insertion order so generated URLs are stable; setting
/// an existing key replaces its value in place.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Creates an empty parameter map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parameter map seeded with the required `appId` and `lang`
    /// fields from the configuration.
    #[must_use]
    pub fn for_config(config: &ApiConfig) -> Self {
        Self::new()
            .with("appId", &config.app_id)
            .with("lang", &config.lang)
    }

    /// Sets a parameter, replacing any existing value for the key.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a parameter in place, replacing any existing value for the key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(pair) = self.pairs.iter_mut().find(|(k, _)| *k == key) {
            pair.1 = value;
        } else {
            self.pairs.push((key, value));
        }
    }

    /// Applies the pagination fields of a page slice.
    #[must_use]
    pub fn paged(self, page: &Page) -> Self {
        self.with("startPosition", page.start_position.to_string())
            .with("limit", page.limit.to_string())
    }

    /// Looks up a parameter value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over the parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
