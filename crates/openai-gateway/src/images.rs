//! Image generation and inpainting gateway backed by the OpenAI API.

use chat_core::{
    async_trait, GatewayError, GeneratedImage, ImageEditRequest, ImageGenerator, ImageRequest,
};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::debug;

use crate::api_types::{ApiError, ImageGenerationRequest, ImageResponse};
use crate::config::OpenAiConfig;

/// An [`ImageGenerator`] implementation backed by the OpenAI image API.
pub struct OpenAiImages {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiImages {
    /// Create a new gateway with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                GatewayError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    /// Create a gateway from environment variables.
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::new(OpenAiConfig::from_env()?)
    }

    async fn read_images(response: reqwest::Response) -> Result<Vec<GeneratedImage>, GatewayError> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
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

        let parsed: ImageResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let images = parsed
            .data
            .into_iter()
            .filter_map(|item| match (item.url, item.b64_json) {
                (Some(url), _) => Some(GeneratedImage::Url(url)),
                (None, Some(b64)) => Some(GeneratedImage::Base64(b64)),
                (None, None) => None,
            })
            .collect();

        Ok(images)
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImages {
    async fn generate(&self, request: ImageRequest) -> Result<Vec<GeneratedImage>, GatewayError> {
        let url = format!("{}/v1/images/generations", self.config.api_url);

        debug!(
            "Generating {} image(s), prompt length: {}",
            request.count,
            request.prompt.len()
        );

        let body = ImageGenerationRequest {
            model: self.config.image_model.clone(),
            prompt: request.prompt,
            n: request.count,
            size: request.size,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Network(format!("Failed to send request: {}", e)))?;

        Self::read_images(response).await
    }

    async fn edit(&self, request: ImageEditRequest) -> Result<Vec<GeneratedImage>, GatewayError> {
        let url = format!("{}/v1/images/edits", self.config.api_url);

        let mut form = Form::new()
            .text("model", self.config.image_model.clone())
            .text("prompt", request.prompt)
            .text("size", request.size)
            .part(
                "image",
                Part::bytes(request.image)
                    .file_name("image.png")
                    .mime_str("image/png")
                    .map_err(|e| GatewayError::Configuration(e.to_string()))?,
            );

        if let Some(mask) = request.mask {
            form = form.part(
                "mask",
                Part::bytes(mask)
                    .file_name("mask.png")
                    .mime_str("image/png")
                    .map_err(|e| GatewayError::Configuration(e.to_string()))?,
            );
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| GatewayError::Network(format!("Failed to send request: {}", e)))?;

        Self::read_images(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generate_network_error() {
        let config = OpenAiConfig::builder()
            .api_key("test-key")
            .api_url("http://127.0.0.1:9")
            .request_timeout(std::time::Duration::from_millis(500))
            .build();

        let gateway = OpenAiImages::new(config).unwrap();
        let result = gateway.generate(ImageRequest::new("a lighthouse")).await;

        assert!(matches!(result, Err(GatewayError::Network(_))));
    }
}
