//! Configuration for the checkout gateway.

use std::env;
use std::time::Duration;

/// Checkout provider configuration. Every field is optional; the surface
/// degrades to a coming-soon fallback when nothing is configured.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Vendor id for server-side pay-link generation.
    pub vendor_id: Option<String>,

    /// Vendor auth code for server-side pay-link generation.
    pub vendor_auth_code: Option<String>,

    /// Client-side checkout token handed to the front end.
    pub client_token: Option<String>,

    /// Seller id handed to the front end.
    pub seller_id: Option<String>,

    /// Provider environment, e.g. "sandbox".
    pub environment: Option<String>,

    /// Vendor API base URL.
    pub api_url: String,

    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Default for CheckoutConfig {
    /// Unconfigured provider with the same URL and timeout fallbacks as
    /// [`CheckoutConfig::from_env`], so a default client stays usable.
    fn default() -> Self {
        Self {
            vendor_id: None,
            vendor_auth_code: None,
            client_token: None,
            seller_id: None,
            environment: None,
            api_url: "https://vendors.paddle.com".to_string(),
            request_timeout: Duration::from_secs(15),
        }
    }
}

impl CheckoutConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `PADDLE_VENDOR_ID` / `PADDLE_VENDOR_AUTH_CODE` - server-side pay links
    /// - `PADDLE_CLIENT_TOKEN` - client-side checkout token
    /// - `PADDLE_SELLER_ID` - seller id for the front end
    /// - `PADDLE_ENV` - provider environment ("sandbox" or "production")
    /// - `PADDLE_API_URL` - vendor API base URL (default: https://vendors.paddle.com)
    /// - `PADDLE_TIMEOUT_SECS` - request timeout in seconds (default: 15)
    pub fn from_env() -> Self {
        let request_timeout = env::var("PADDLE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(15));

        Self {
            vendor_id: env::var("PADDLE_VENDOR_ID").ok(),
            vendor_auth_code: env::var("PADDLE_VENDOR_AUTH_CODE").ok(),
            client_token: env::var("PADDLE_CLIENT_TOKEN").ok(),
            seller_id: env::var("PADDLE_SELLER_ID").ok(),
            environment: env::var("PADDLE_ENV").ok(),
            api_url: env::var("PADDLE_API_URL")
                .unwrap_or_else(|_| "https://vendors.paddle.com".to_string()),
            request_timeout,
        }
    }

    /// Whether server-side pay-link generation is configured.
    pub fn has_vendor_credentials(&self) -> bool {
        self.vendor_id.is_some() && self.vendor_auth_code.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_env_fallbacks() {
        let config = CheckoutConfig::default();
        assert_eq!(config.api_url, "https://vendors.paddle.com");
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert!(!config.has_vendor_credentials());
    }
}
