//! Configuration for the OpenAI gateways.

use std::env;
use std::time::Duration;

use chat_core::GatewayError;

/// Configuration shared by the chat and image gateways.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API base URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Chat completion model.
    pub chat_model: String,

    /// Image generation model.
    pub image_model: String,

    /// Per-request timeout. The transport default is unbounded enough to
    /// stall a chat turn, so every call carries this explicit bound.
    pub request_timeout: Duration,

    /// Retry a failed call once when the failure looks transient.
    pub retry_transient: bool,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com".to_string(),
            api_key: String::new(),
            chat_model: "gpt-4o-mini".to_string(),
            image_model: "gpt-image-1".to_string(),
            request_timeout: Duration::from_secs(60),
            retry_transient: true,
        }
    }
}

impl OpenAiConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `OPENAI_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `OPENAI_API_URL` - API base URL (default: https://api.openai.com)
    /// - `OPENAI_CHAT_MODEL` - Chat model (default: gpt-4o-mini)
    /// - `OPENAI_IMAGE_MODEL` - Image model (default: gpt-image-1)
    /// - `OPENAI_TIMEOUT_SECS` - Request timeout in seconds (default: 60)
    /// - `OPENAI_RETRY_TRANSIENT` - Retry once on transient failure (default: true)
    pub fn from_env() -> Result<Self, GatewayError> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| GatewayError::Configuration("OPENAI_API_KEY not set".to_string()))?;

        let api_url =
            env::var("OPENAI_API_URL").unwrap_or_else(|_| "https://api.openai.com".to_string());

        let chat_model =
            env::var("OPENAI_CHAT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let image_model =
            env::var("OPENAI_IMAGE_MODEL").unwrap_or_else(|_| "gpt-image-1".to_string());

        let request_timeout = env::var("OPENAI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(60));

        let retry_transient = env::var("OPENAI_RETRY_TRANSIENT")
            .ok()
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(true);

        Ok(Self {
            api_url,
            api_key,
            chat_model,
            image_model,
            request_timeout,
            retry_transient,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> OpenAiConfigBuilder {
        OpenAiConfigBuilder::default()
    }
}

/// Builder for [`OpenAiConfig`].
#[derive(Debug, Default)]
pub struct OpenAiConfigBuilder {
    config: OpenAiConfig,
}

impl OpenAiConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API base URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the chat model.
    pub fn chat_model(mut self, model: impl Into<String>) -> Self {
        self.config.chat_model = model.into();
        self
    }

    /// Set the image model.
    pub fn image_model(mut self, model: impl Into<String>) -> Self {
        self.config.image_model = model.into();
        self
    }

    /// Set the request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Enable or disable the single transient retry.
    pub fn retry_transient(mut self, retry: bool) -> Self {
        self.config.retry_transient = retry;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> OpenAiConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OpenAiConfig::default();

        assert_eq!(config.api_url, "https://api.openai.com");
        assert!(config.api_key.is_empty());
        assert_eq!(config.chat_model, "gpt-4o-mini");
        assert_eq!(config.image_model, "gpt-image-1");
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert!(config.retry_transient);
    }

    #[test]
    fn test_builder() {
        let config = OpenAiConfig::builder()
            .api_key("test-key")
            .api_url("https://proxy.example.com")
            .chat_model("gpt-4o")
            .image_model("dall-e-3")
            .request_timeout(Duration::from_secs(10))
            .retry_transient(false)
            .build();

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.api_url, "https://proxy.example.com");
        assert_eq!(config.chat_model, "gpt-4o");
        assert_eq!(config.image_model, "dall-e-3");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(!config.retry_transient);
    }
}
