//! Configuration for the identity gateway.

use std::env;
use std::time::Duration;

use chat_core::GatewayError;

/// Configuration for [`crate::AuthClient`].
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Auth service base URL.
    pub api_url: String,

    /// Publishable (anon) API key sent alongside user tokens.
    pub anon_key: String,

    /// Per-request timeout.
    pub request_timeout: Duration,

    /// How long a verified identity stays cached.
    pub cache_ttl: Duration,
}

impl AuthConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `AUTH_API_URL` - Auth service base URL
    /// - `AUTH_ANON_KEY` - Publishable API key
    ///
    /// Optional environment variables:
    /// - `AUTH_TIMEOUT_SECS` - Request timeout in seconds (default: 10)
    /// - `AUTH_CACHE_TTL_SECS` - Identity cache TTL in seconds (default: 60)
    pub fn from_env() -> Result<Self, GatewayError> {
        let api_url = env::var("AUTH_API_URL")
            .map_err(|_| GatewayError::Configuration("AUTH_API_URL not set".to_string()))?;

        let anon_key = env::var("AUTH_ANON_KEY")
            .map_err(|_| GatewayError::Configuration("AUTH_ANON_KEY not set".to_string()))?;

        let request_timeout = env::var("AUTH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(10));

        let cache_ttl = env::var("AUTH_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(60));

        Ok(Self {
            api_url,
            anon_key,
            request_timeout,
            cache_ttl,
        })
    }

    /// Create a config with explicit values (used by tests).
    pub fn new(api_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            anon_key: anon_key.into(),
            request_timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(60),
        }
    }
}
