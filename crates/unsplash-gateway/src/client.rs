//! Photo search client.

use chat_core::{async_trait, GatewayError, ImageSearch, ImageSearchResult};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::UnsplashConfig;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    id: String,
    urls: PhotoUrls,
    #[serde(default)]
    tags: Vec<PhotoTag>,
    user: PhotoUser,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    small: String,
    full: String,
}

#[derive(Debug, Deserialize)]
struct PhotoTag {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PhotoUser {
    name: Option<String>,
}

/// Client for the Unsplash photo search API.
pub struct UnsplashClient {
    client: Client,
    config: UnsplashConfig,
}

impl UnsplashClient {
    /// Create a new client with the given configuration.
    pub fn new(config: UnsplashConfig) -> Result<Self, GatewayError> {
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
        Self::new(UnsplashConfig::from_env())
    }
}

#[async_trait]
impl ImageSearch for UnsplashClient {
    async fn search(&self, query: &str) -> Result<Vec<ImageSearchResult>, GatewayError> {
        let access_key = self.config.access_key.as_deref().ok_or_else(|| {
            GatewayError::Configuration("UNSPLASH_ACCESS_KEY not set".to_string())
        })?;

        let url = format!("{}/search/photos", self.config.api_url);

        debug!(query, "Searching reference photos");

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Client-ID {}", access_key))
            .query(&[
                ("query", query),
                ("per_page", &self.config.per_page.to_string()),
                ("orientation", "squarish"),
            ])
            .send()
            .await
            .map_err(|e| GatewayError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GatewayError::Provider(format!(
                "Unsplash error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(parsed
            .results
            .into_iter()
            .map(|photo| ImageSearchResult {
                id: photo.id,
                thumb_url: photo.urls.small,
                full_url: photo.urls.full,
                tags: photo.tags.into_iter().filter_map(|t| t.title).collect(),
                source: format!(
                    "Unsplash · {}",
                    photo.user.name.as_deref().unwrap_or("Unknown")
                ),
            })
            .collect())
    }
}
