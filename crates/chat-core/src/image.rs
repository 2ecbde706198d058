//! Image generation and inpainting gateway traits.

use async_trait::async_trait;

use crate::error::GatewayError;

/// A prompt-to-image request.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    /// Full prompt text.
    pub prompt: String,
    /// Number of images to generate.
    pub count: u32,
    /// Output size, e.g. "1024x1024".
    pub size: String,
}

impl ImageRequest {
    /// Create a request with the default count and size.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            count: 4,
            size: "1024x1024".to_string(),
        }
    }
}

/// An image-to-image / inpainting request.
#[derive(Debug, Clone)]
pub struct ImageEditRequest {
    /// Edit instruction prompt.
    pub prompt: String,
    /// Base image bytes (PNG).
    pub image: Vec<u8>,
    /// Optional mask bytes (PNG, transparent where the edit applies).
    pub mask: Option<Vec<u8>>,
    /// Output size, e.g. "1024x1024".
    pub size: String,
}

/// A generated image, as a URL or inline data.
#[derive(Debug, Clone)]
pub enum GeneratedImage {
    /// Hosted URL returned by the provider.
    Url(String),
    /// Base64-encoded PNG payload.
    Base64(String),
}

impl GeneratedImage {
    /// Render as a value the front end can put in an `<img src>`.
    pub fn to_src(&self) -> String {
        match self {
            GeneratedImage::Url(url) => url.clone(),
            GeneratedImage::Base64(data) => format!("data:image/png;base64,{}", data),
        }
    }
}

/// An image generation gateway.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate images from a prompt.
    async fn generate(&self, request: ImageRequest) -> Result<Vec<GeneratedImage>, GatewayError>;

    /// Edit a base image, optionally constrained by a mask.
    async fn edit(&self, request: ImageEditRequest) -> Result<Vec<GeneratedImage>, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_image_to_src() {
        let url = GeneratedImage::Url("https://example.com/a.png".to_string());
        assert_eq!(url.to_src(), "https://example.com/a.png");

        let inline = GeneratedImage::Base64("QUJD".to_string());
        assert_eq!(inline.to_src(), "data:image/png;base64,QUJD");
    }
}
