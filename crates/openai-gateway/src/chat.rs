//! Chat completion gateway backed by the OpenAI API.

use std::time::Duration;

use chat_core::{
    async_trait, ChatModel, Completion, CompletionOptions, GatewayError, ProviderMessage,
    TokenUsage,
};
use reqwest::Client;
use tracing::{debug, warn};

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse};
use crate::config::OpenAiConfig;

/// Delay before the single transient retry.
const RETRY_DELAY: Duration = Duration::from_millis(250);

/// A [`ChatModel`] implementation backed by OpenAI chat completions.
///
/// Every request carries the configured timeout, and a transient failure
/// (network error, provider 5xx) is retried exactly once.
pub struct OpenAiChat {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiChat {
    /// Create a new gateway with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                GatewayError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        tracing::info!(
            "OpenAiChat initialized with model: {}, timeout: {:?}",
            config.chat_model,
            config.request_timeout
        );

        Ok(Self { client, config })
    }

    /// Create a gateway from environment variables.
    ///
    /// See [`OpenAiConfig::from_env`] for the variables consumed.
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::new(OpenAiConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Make a single chat completion request.
    async fn chat_completion(
        &self,
        messages: &[ProviderMessage],
        options: CompletionOptions,
    ) -> Result<ChatCompletionResponse, GatewayError> {
        let url = format!("{}/v1/chat/completions", self.config.api_url);

        let request = ChatCompletionRequest {
            model: self.config.chat_model.clone(),
            messages: messages.to_vec(),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        debug!("Sending request to OpenAI API: {} messages", messages.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            // Try to parse as a structured API error
            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(GatewayError::Provider(format!(
                    "API error ({}): {}",
                    status.as_u16(),
                    api_error.error.message
                )));
            }

            return Err(GatewayError::Provider(format!(
                "API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(completion)
    }
}

#[async_trait]
impl ChatModel for OpenAiChat {
    async fn complete(
        &self,
        messages: Vec<ProviderMessage>,
        options: CompletionOptions,
    ) -> Result<Completion, GatewayError> {
        let completion = match self.chat_completion(&messages, options).await {
            Ok(completion) => completion,
            Err(err) if self.config.retry_transient && err.is_transient() => {
                warn!("Transient completion failure, retrying once: {}", err);
                tokio::time::sleep(RETRY_DELAY).await;
                self.chat_completion(&messages, options).await?
            }
            Err(err) => return Err(err),
        };

        let text = completion
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| {
                warn!("No content in completion response");
                String::new()
            });

        let usage = completion.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        if let Some(usage) = usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        Ok(Completion {
            text,
            model: self.config.chat_model.clone(),
            usage,
        })
    }

    fn model_name(&self) -> &str {
        &self.config.chat_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_name() {
        let config = OpenAiConfig::builder()
            .api_key("test-key")
            .chat_model("gpt-4o-mini")
            .build();

        let gateway = OpenAiChat::new(config).unwrap();
        assert_eq!(gateway.model_name(), "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_network_error_is_reported() {
        // Port 9 on localhost refuses connections
        let config = OpenAiConfig::builder()
            .api_key("test-key")
            .api_url("http://127.0.0.1:9")
            .request_timeout(Duration::from_millis(500))
            .retry_transient(false)
            .build();

        let gateway = OpenAiChat::new(config).unwrap();
        let result = gateway
            .complete(
                vec![ProviderMessage::user("hello")],
                CompletionOptions::default(),
            )
            .await;

        assert!(matches!(result, Err(GatewayError::Network(_))));
    }
}
