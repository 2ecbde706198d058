//! Gateway error types.

use thiserror::Error;

/// Errors that can occur when talking to an external gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network-level failure (connect, timeout, transport).
    #[error("network error: {0}")]
    Network(String),

    /// The provider returned an error response.
    #[error("provider error: {0}")]
    Provider(String),

    /// The provider response could not be parsed.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// Whether a single retry is worth attempting.
    ///
    /// Network failures and provider errors are treated as transient;
    /// configuration and parse errors are not.
    pub fn is_transient(&self) -> bool {
        matches!(self, GatewayError::Network(_) | GatewayError::Provider(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(GatewayError::Network("timeout".into()).is_transient());
        assert!(GatewayError::Provider("503".into()).is_transient());
        assert!(!GatewayError::Configuration("no key".into()).is_transient());
        assert!(!GatewayError::InvalidResponse("bad json".into()).is_transient());
    }
}
