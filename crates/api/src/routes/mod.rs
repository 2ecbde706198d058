//! Route handlers for the HTTP API.

pub mod characters;
pub mod chat;
pub mod checkout;
pub mod credits;
pub mod health;
pub mod images;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;
use chat_core::AuthUser;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Characters and chat
        .route("/api/characters", get(characters::list))
        .route("/api/characters/:id", get(characters::detail))
        .route("/api/characters/:id/chats", get(characters::chat_log))
        .route("/api/characters/:id/chat", post(chat::send))
        // Credits and rewarded ads
        .route("/api/credit-config", get(credits::credit_config))
        .route("/api/ad-session", post(credits::create_ad_session))
        .route("/api/earn-credits", post(credits::earn_credits))
        // Checkout
        .route("/api/buy-plan", post(checkout::buy_plan))
        // Image generation and reference search
        .route("/api/generate-images", post(images::generate))
        .route("/api/search-images", post(images::search))
}

/// Extract the bearer token from the Authorization header.
///
/// A missing or malformed header yields an empty token, which the verifier
/// rejects.
pub fn bearer_token(headers: &HeaderMap) -> &str {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("")
}

/// Resolve the calling user or fail with 401.
pub async fn require_user(state: &AppState, headers: &HeaderMap) -> Result<AuthUser> {
    state
        .verifier
        .verify(bearer_token(headers))
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?
        .ok_or(ApiError::Unauthorized)
}
