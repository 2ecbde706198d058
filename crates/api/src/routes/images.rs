//! Image generation and reference-search routes.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use chat_core::{ImageRequest, ImageSearchResult};

use crate::error::Result;
use crate::state::AppState;

const FALLBACK_PROMPT: &str = "A clean, colorful illustration, high quality, 4k";
const FALLBACK_QUERY: &str = "abstract colorful gradient";

/// Image generation request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImagesRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub reference_urls: Vec<String>,
}

/// Image generation response.
#[derive(Debug, Serialize)]
pub struct GenerateImagesResponse {
    pub images: Vec<String>,
}

/// Compose the final prompt from the free-form prompt, keyword hints, and
/// style-reference URLs.
fn compose_prompt(request: &GenerateImagesRequest) -> String {
    let mut prompt = match request.prompt.as_deref().map(str::trim) {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => FALLBACK_PROMPT.to_string(),
    };

    if let Some(keywords) = request.keywords.as_deref().filter(|k| !k.is_empty()) {
        prompt.push_str(&format!("\n\nKeywords: {}", keywords));
    }

    if !request.reference_urls.is_empty() {
        let refs = request
            .reference_urls
            .iter()
            .enumerate()
            .map(|(i, url)| format!("{}. {}", i + 1, url))
            .collect::<Vec<_>>()
            .join("\n");
        prompt.push_str(&format!(
            "\n\nUse these image URLs only as style/pose reference (do NOT copy exactly):\n{}",
            refs
        ));
    }

    prompt
}

/// Generate a batch of images from a composed prompt.
pub async fn generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateImagesRequest>,
) -> Result<Json<GenerateImagesResponse>> {
    let prompt = compose_prompt(&body);
    info!(
        prompt_len = prompt.len(),
        reference_count = body.reference_urls.len(),
        "Generating images"
    );

    let generated = state.images.generate(ImageRequest::new(prompt)).await?;
    let images = generated.iter().map(|img| img.to_src()).collect();

    Ok(Json(GenerateImagesResponse { images }))
}

/// Reference-image search request body.
#[derive(Debug, Deserialize)]
pub struct SearchImagesRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
}

/// Join the prompt and keyword hints into one search query, falling back to
/// a generic query when both are blank.
fn compose_query(request: &SearchImagesRequest) -> String {
    let query = [request.prompt.as_deref(), request.keywords.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if query.is_empty() {
        FALLBACK_QUERY.to_string()
    } else {
        query
    }
}

/// Search stock photos to offer as style/pose references.
pub async fn search(
    State(state): State<AppState>,
    Json(body): Json<SearchImagesRequest>,
) -> Result<Json<Vec<ImageSearchResult>>> {
    let query = compose_query(&body);
    info!(query = %query, "Searching reference images");

    let results = state.search.search(&query).await?;
    Ok(Json(results))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_prompt_fallback() {
        let request = GenerateImagesRequest {
            prompt: Some("   ".to_string()),
            keywords: None,
            reference_urls: vec![],
        };
        assert_eq!(compose_prompt(&request), FALLBACK_PROMPT);
    }

    #[test]
    fn test_compose_prompt_full() {
        let request = GenerateImagesRequest {
            prompt: Some("a red fox".to_string()),
            keywords: Some("forest, dawn".to_string()),
            reference_urls: vec!["https://example.com/a.png".to_string()],
        };

        let prompt = compose_prompt(&request);
        assert!(prompt.starts_with("a red fox"));
        assert!(prompt.contains("Keywords: forest, dawn"));
        assert!(prompt.contains("1. https://example.com/a.png"));
    }

    #[test]
    fn test_compose_query_joins_prompt_and_keywords() {
        let request = SearchImagesRequest {
            prompt: Some("a red fox".to_string()),
            keywords: Some("forest".to_string()),
        };
        assert_eq!(compose_query(&request), "a red fox forest");
    }

    #[test]
    fn test_compose_query_fallback() {
        let request = SearchImagesRequest {
            prompt: Some("  ".to_string()),
            keywords: None,
        };
        assert_eq!(compose_query(&request), FALLBACK_QUERY);
    }
}
