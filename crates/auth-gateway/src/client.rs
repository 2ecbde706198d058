//! Remote identity verification client.

use chat_core::{async_trait, AuthUser, GatewayError, IdentityVerifier};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::config::AuthConfig;

/// The user payload returned by the auth service.
#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
    email: Option<String>,
}

/// Verifies bearer tokens against a GoTrue-style auth service
/// (`GET /auth/v1/user`).
pub struct AuthClient {
    client: Client,
    config: AuthConfig,
}

impl AuthClient {
    /// Create a new client with the given configuration.
    pub fn new(config: AuthConfig) -> Result<Self, GatewayError> {
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
        Self::new(AuthConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

#[async_trait]
impl IdentityVerifier for AuthClient {
    async fn verify(&self, token: &str) -> Result<Option<AuthUser>, GatewayError> {
        if token.is_empty() {
            return Ok(None);
        }

        let url = format!("{}/auth/v1/user", self.config.api_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .header("apikey", &self.config.anon_key)
            .send()
            .await
            .map_err(|e| GatewayError::Network(format!("Failed to verify credential: {}", e)))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!("Credential rejected by auth service");
                Ok(None)
            }
            status if status.is_success() => {
                let user: UserResponse = response.json().await.map_err(|e| {
                    GatewayError::InvalidResponse(format!("Failed to parse user: {}", e))
                })?;

                Ok(Some(AuthUser {
                    id: user.id,
                    email: user.email,
                }))
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(GatewayError::Provider(format!(
                    "Auth service error ({}): {}",
                    status.as_u16(),
                    error_text
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_token_is_unauthorized() {
        let client = AuthClient::new(AuthConfig::new("http://127.0.0.1:9", "anon")).unwrap();
        let result = client.verify("").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        let mut config = AuthConfig::new("http://127.0.0.1:9", "anon");
        config.request_timeout = std::time::Duration::from_millis(500);

        let client = AuthClient::new(config).unwrap();
        let result = client.verify("some-token").await;
        assert!(matches!(result, Err(GatewayError::Network(_))));
    }
}
