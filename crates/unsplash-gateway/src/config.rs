//! Configuration for the Unsplash gateway.

use std::env;
use std::time::Duration;

/// Unsplash API configuration. The access key is optional; without it every
/// search fails with a configuration error instead of a network round trip.
#[derive(Debug, Clone)]
pub struct UnsplashConfig {
    /// Unsplash access key, sent as a `Client-ID` authorization header.
    pub access_key: Option<String>,

    /// API base URL.
    pub api_url: String,

    /// Number of photos requested per search.
    pub per_page: u8,

    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Default for UnsplashConfig {
    /// Keyless configuration with the same URL and timeout fallbacks as
    /// [`UnsplashConfig::from_env`].
    fn default() -> Self {
        Self {
            access_key: None,
            api_url: "https://api.unsplash.com".to_string(),
            per_page: 12,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl UnsplashConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `UNSPLASH_ACCESS_KEY` - API access key
    /// - `UNSPLASH_API_URL` - API base URL (default: https://api.unsplash.com)
    /// - `UNSPLASH_TIMEOUT_SECS` - request timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        let request_timeout = env::var("UNSPLASH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(10));

        Self {
            access_key: env::var("UNSPLASH_ACCESS_KEY").ok(),
            api_url: env::var("UNSPLASH_API_URL")
                .unwrap_or_else(|_| "https://api.unsplash.com".to_string()),
            per_page: 12,
            request_timeout,
        }
    }

    /// Whether an access key is configured.
    pub fn has_access_key(&self) -> bool {
        self.access_key.is_some()
    }

    /// Set the API base URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Set the access key.
    pub fn with_access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_env_fallbacks() {
        let config = UnsplashConfig::default();
        assert_eq!(config.api_url, "https://api.unsplash.com");
        assert_eq!(config.per_page, 12);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(!config.has_access_key());
    }

    #[test]
    fn test_builder() {
        let config = UnsplashConfig::default()
            .with_api_url("http://localhost:9000")
            .with_access_key("test-key");
        assert_eq!(config.api_url, "http://localhost:9000");
        assert!(config.has_access_key());
    }
}
