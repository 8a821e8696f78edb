//! API endpoint configuration.
//!
//! The application identifier is an explicit value threaded from the CLI
//! (flag or `ESTAT_APP_ID` environment variable); there is no ambient
//! default credential. Base URL and version carry documented defaults and
//! stay overridable, which also lets tests point the client at a local
//! mock server.

/// Default API base path.
pub const DEFAULT_BASE_URL: &str = "https://api.e-stat.go.jp/rest";

/// Default API version segment.
pub const DEFAULT_API_VERSION: &str = "3.0";

/// Default response language (`"J"` for Japanese, `"E"` for English).
pub const DEFAULT_LANG: &str = "J";

/// Configuration for building API request URLs.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Application identifier, required on every request.
    pub app_id: String,
    /// Response language.
    pub lang: String,
    /// API base path, without trailing slash.
    pub base_url: String,
    /// API version segment.
    pub version: String,
}

impl ApiConfig {
    /// Creates a configuration with the given application identifier and
    /// documented defaults for everything else.
    #[must_use]
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            lang: DEFAULT_LANG.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Overrides the response language.
    #[must_use]
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Overrides the base URL (primarily for tests against a mock server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Overrides the API version segment.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}
