//! Reference-image search gateway trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// One stock photo returned by a reference-image search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSearchResult {
    /// Provider-side photo id.
    pub id: String,
    /// Small preview URL.
    pub thumb_url: String,
    /// Full-resolution URL.
    pub full_url: String,
    /// Tags attached to the photo.
    pub tags: Vec<String>,
    /// Attribution line, e.g. the provider and photographer name.
    pub source: String,
}

/// A stock-photo search gateway. Results feed the image generation flow as
/// style/pose references.
#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// Search photos matching a free-text query.
    async fn search(&self, query: &str) -> Result<Vec<ImageSearchResult>, GatewayError>;
}
