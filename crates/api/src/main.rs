//! HTTP API server for the character chat service.
//!
//! Serves the static front end plus the JSON API: credit-metered chat turns,
//! character and chat-log reads, credit configuration, rewarded-ad crediting,
//! plan checkout, image generation, and reference-image search.

mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use auth_gateway::{AuthClient, AuthConfig, CachedVerifier};
use checkout_gateway::CheckoutClient;
use database::Database;
use openai_gateway::{OpenAiChat, OpenAiConfig, OpenAiImages};
use orchestrator::{TurnConfig, TurnOrchestrator};
use tower_http::services::ServeDir;
use unsplash_gateway::UnsplashClient;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting API server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Build gateways
    let openai_config = OpenAiConfig::from_env()?;
    let chat = Arc::new(OpenAiChat::new(openai_config.clone())?);
    let images = Arc::new(OpenAiImages::new(openai_config)?);

    let auth_config = AuthConfig::from_env()?;
    let cache_ttl = auth_config.cache_ttl;
    let verifier = Arc::new(CachedVerifier::new(
        Arc::new(AuthClient::new(auth_config)?),
        cache_ttl,
    ));

    let search = Arc::new(UnsplashClient::from_env()?);

    let checkout = Arc::new(CheckoutClient::from_env()?);

    // Build the orchestrator and application state
    let orchestrator = Arc::new(TurnOrchestrator::new(
        db.clone(),
        chat,
        verifier.clone(),
        TurnConfig::default(),
    ));
    let state = AppState::new(db, orchestrator, verifier, images, search, checkout);

    // Build router
    let app = routes::router()
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "API server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
