//! Pay-link generation client.

use chat_core::GatewayError;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::CheckoutConfig;

#[derive(Debug, Deserialize)]
struct PayLinkResponse {
    success: bool,
    response: Option<PayLinkBody>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct PayLinkBody {
    url: Option<String>,
}

/// Client for the Paddle classic vendor API.
pub struct CheckoutClient {
    client: Client,
    config: CheckoutConfig,
}

impl CheckoutClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CheckoutConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                GatewayError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::new(CheckoutConfig::from_env())
    }

    /// Get the configuration.
    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    /// Generate a hosted checkout URL for a product.
    ///
    /// `passthrough` is echoed back by the provider's webhooks and is used to
    /// tie a completed payment back to a plan and user.
    pub async fn generate_pay_link(
        &self,
        product_id: &str,
        passthrough: &serde_json::Value,
    ) -> Result<String, GatewayError> {
        let vendor_id = self.config.vendor_id.as_deref().ok_or_else(|| {
            GatewayError::Configuration("PADDLE_VENDOR_ID not set".to_string())
        })?;
        let vendor_auth_code = self.config.vendor_auth_code.as_deref().ok_or_else(|| {
            GatewayError::Configuration("PADDLE_VENDOR_AUTH_CODE not set".to_string())
        })?;

        let url = format!("{}/api/2.0/product/generate_pay_link", self.config.api_url);
        let form = [
            ("vendor_id", vendor_id),
            ("vendor_auth_code", vendor_auth_code),
            ("product_id", product_id),
            ("passthrough", &passthrough.to_string()),
        ];

        debug!(product_id, "Requesting checkout pay link");

        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| GatewayError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GatewayError::Provider(format!(
                "Checkout provider error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let parsed: PayLinkResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        if !parsed.success {
            return Err(GatewayError::Provider(format!(
                "Pay link generation failed: {}",
                parsed
                    .error
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "unknown error".to_string())
            )));
        }

        parsed
            .response
            .and_then(|body| body.url)
            .ok_or_else(|| GatewayError::InvalidResponse("No checkout URL in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_vendor_credentials() {
        let client = CheckoutClient::new(CheckoutConfig::default()).unwrap();
        let result = client
            .generate_pay_link("12345", &serde_json::json!({"planCode": "starter"}))
            .await;

        assert!(matches!(result, Err(GatewayError::Configuration(_))));
    }
}
