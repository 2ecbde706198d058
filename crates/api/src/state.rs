//! Application state shared across handlers.

use std::sync::Arc;

use chat_core::{IdentityVerifier, ImageGenerator, ImageSearch};
use checkout_gateway::CheckoutClient;
use database::Database;
use orchestrator::TurnOrchestrator;

/// Rewarded-ad crediting settings.
#[derive(Debug, Clone, Copy)]
pub struct AdRewardConfig {
    /// Credits granted per completed ad.
    pub credits: i64,
    /// Maximum rewarded ads per day.
    pub max_per_day: i64,
}

impl Default for AdRewardConfig {
    fn default() -> Self {
        Self {
            credits: 5,
            max_per_day: 3,
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Chat turn orchestrator.
    pub orchestrator: Arc<TurnOrchestrator>,
    /// Identity verifier for routes outside the chat turn.
    pub verifier: Arc<dyn IdentityVerifier>,
    /// Image generation gateway.
    pub images: Arc<dyn ImageGenerator>,
    /// Reference-image search gateway.
    pub search: Arc<dyn ImageSearch>,
    /// Checkout gateway.
    pub checkout: Arc<CheckoutClient>,
    /// Rewarded-ad settings.
    pub ad_reward: AdRewardConfig,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        db: Database,
        orchestrator: Arc<TurnOrchestrator>,
        verifier: Arc<dyn IdentityVerifier>,
        images: Arc<dyn ImageGenerator>,
        search: Arc<dyn ImageSearch>,
        checkout: Arc<CheckoutClient>,
    ) -> Self {
        Self {
            db,
            orchestrator,
            verifier,
            images,
            search,
            checkout,
            ad_reward: AdRewardConfig::default(),
        }
    }
}
