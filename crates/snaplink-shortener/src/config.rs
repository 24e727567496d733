//! Static configuration of the mapping engine.

use jiff::SignedDuration;
use snaplink_core::shortcode::{MAX_LENGTH, MIN_LENGTH};
use thiserror::Error;
use typed_builder::TypedBuilder;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_CODE_LENGTH: usize = 6;
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Configuration for a [`ShortenerService`](crate::ShortenerService).
///
/// The engine never reads the environment; callers build this once and hand
/// it over at construction.
///
/// # Example
///
/// ```rust
/// use snaplink_shortener::ShortenerConfig;
///
/// let config = ShortenerConfig::builder()
///     .base_url("https://sl.example".to_string())
///     .code_length(8)
///     .build();
/// assert!(config.smart_alias);
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerConfig {
    /// Prefix of every composed short URL, without trailing slash.
    #[builder(default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,

    /// Length of random codes.
    #[builder(default = DEFAULT_CODE_LENGTH)]
    pub code_length: usize,

    /// Derive aliases from the URL when no custom alias is given.
    /// When off, such creations get random codes.
    #[builder(default = true)]
    pub smart_alias: bool,

    /// Default number of entries returned by `recent`.
    #[builder(default = DEFAULT_RECENT_LIMIT)]
    pub recent_limit: usize,

    /// Records created within this window count as recent in stats.
    #[builder(default = SignedDuration::from_hours(7 * 24))]
    pub recent_window: SignedDuration,
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

const MAX_RECENT_WINDOW: SignedDuration = SignedDuration::from_hours(100 * 365 * 24);

impl ShortenerConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute http(s) URL or
    /// the code length is outside the short code bounds, or the recent window
    /// is negative or longer than a century.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(format!("{}: {e}", self.base_url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl(format!(
                "scheme must be http or https: {}",
                self.base_url
            )));
        }

        if !(MIN_LENGTH..=MAX_LENGTH).contains(&self.code_length) {
            return Err(ConfigError::InvalidCodeLength(self.code_length));
        }

        if self.recent_window.is_negative() || self.recent_window > MAX_RECENT_WINDOW {
            return Err(ConfigError::InvalidRecentWindow(self.recent_window));
        }

        Ok(())
    }

    /// The base URL without any trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    #[error("code length must be between 1 and 20, got {0}")]
    InvalidCodeLength(usize),
    #[error("recent window must be between 0 and 100 years, got {0}")]
    InvalidRecentWindow(SignedDuration),
}
