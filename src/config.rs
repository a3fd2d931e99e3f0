//! Connection and polling configuration.
//!
//! Built once at startup from CLI flags / environment and handed to the
//! transport and client explicitly.

use std::time::Duration;

use crate::error::{McpError, Result};

/// Default HTTP request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default sleep between job status fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default number of job status fetches before giving up.
pub const DEFAULT_MAX_POLLS: u64 = 60;

/// How `run_query` waits for a job.
///
/// The interval and the iteration count are independent: a run gives up
/// after `max_polls` status fetches regardless of how long each sleep is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Sleep before each status fetch.
    pub interval: Duration,
    /// Maximum number of status fetches.
    pub max_polls: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }
}

/// Validated server configuration.
#[derive(Clone)]
pub struct Config {
    base_url: String,
    api_key: String,
    timeout: Duration,
    poll: PollSettings,
}

impl Config {
    /// Create a configuration, rejecting an empty URL or API key.
    ///
    /// A trailing `/` on the URL is dropped so endpoint paths can be appended
    /// directly.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        let api_key = api_key.trim();

        if base_url.is_empty() {
            return Err(McpError::Config("Redash URL is required".to_string()));
        }
        if api_key.is_empty() {
            return Err(McpError::Config("Redash API key is required".to_string()));
        }

        Ok(Self {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            timeout: DEFAULT_TIMEOUT,
            poll: PollSettings::default(),
        })
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the run-and-wait polling behaviour.
    pub fn with_poll(mut self, poll: PollSettings) -> Self {
        self.poll = poll;
        self
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// API key sent in the `Authorization` header.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Polling settings for `run_query`.
    pub fn poll(&self) -> PollSettings {
        self.poll
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("poll", &self.poll)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = Config::new("https://redash.example.com///", "k").unwrap();
        assert_eq!(config.base_url(), "https://redash.example.com");
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(config.poll(), PollSettings::default());
    }

    #[test]
    fn test_missing_url_or_key_is_rejected() {
        assert!(matches!(Config::new("", "key"), Err(McpError::Config(_))));
        assert!(matches!(Config::new("/", "key"), Err(McpError::Config(_))));
        assert!(matches!(
            Config::new("https://redash.example.com", "  "),
            Err(McpError::Config(_))
        ));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = Config::new("https://redash.example.com", "s3cret").unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_builders_override_defaults() {
        let poll = PollSettings {
            interval: Duration::from_millis(250),
            max_polls: 5,
        };
        let config = Config::new("http://localhost:5000", "k")
            .unwrap()
            .with_timeout(Duration::from_secs(3))
            .with_poll(poll);
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.poll(), poll);
    }
}
