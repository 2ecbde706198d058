//! Credit configuration and rewarded-ad routes.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use database::{ad_session, plan, time, wallet};

use crate::error::{ApiError, Result};
use crate::routes::require_user;
use crate::state::AppState;

/// Ledger category recorded for ad rewards. The daily cap counts entries in
/// this category.
const AD_REWARD_CATEGORY: &str = "ad_reward";
const AD_SESSION_TTL_MINUTES: i64 = 5;
const DEFAULT_AD_NETWORK: &str = "GAM";

/// UTC midnight of the current day, in the stored timestamp format.
fn today_start() -> String {
    format!("{}T00:00:00.000Z", Utc::now().format("%Y-%m-%d"))
}

/// A plan as presented to the front end, with features parsed to JSON.
#[derive(Debug, Serialize)]
pub struct PlanView {
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub features: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdRewardView {
    pub credits: i64,
    pub max_per_day: i64,
}

/// Credit configuration response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditConfigResponse {
    pub success: bool,
    pub plans: Vec<PlanView>,
    pub ad_reward: AdRewardView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paddle_vendor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paddle_seller_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paddle_client_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paddle_env: Option<String>,
}

/// Active plans plus the reward and checkout settings the front end needs.
pub async fn credit_config(State(state): State<AppState>) -> Result<Json<CreditConfigResponse>> {
    let plans = plan::list_active_plans(state.db.pool())
        .await?
        .into_iter()
        .map(|p| PlanView {
            id: p.id,
            code: p.code,
            name: p.name,
            description: p.description,
            price_cents: p.price_cents,
            features: p.features.as_deref().and_then(|f| serde_json::from_str(f).ok()),
        })
        .collect();

    let checkout = state.checkout.config();
    Ok(Json(CreditConfigResponse {
        success: true,
        plans,
        ad_reward: AdRewardView {
            credits: state.ad_reward.credits,
            max_per_day: state.ad_reward.max_per_day,
        },
        paddle_vendor_id: checkout.vendor_id.clone(),
        paddle_seller_id: checkout.seller_id.clone(),
        paddle_client_token: checkout.client_token.clone(),
        paddle_env: checkout.environment.clone(),
    }))
}

/// Ad session response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdSessionResponse {
    pub success: bool,
    pub session_id: String,
    pub expires_at: String,
}

/// Issue a single-use ad session before the client starts a rewarded ad.
///
/// The client carries the session id through the ad request and submits it
/// back via `/api/earn-credits` once the ad completes.
pub async fn create_ad_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AdSessionResponse>> {
    let user = require_user(&state, &headers).await?;

    let session_id = Uuid::new_v4().to_string();
    let expires_at = time::format(Utc::now() + chrono::Duration::minutes(AD_SESSION_TTL_MINUTES));

    ad_session::create_ad_session(
        state.db.pool(),
        &session_id,
        &user.id,
        DEFAULT_AD_NETWORK,
        &expires_at,
    )
    .await?;

    Ok(Json(AdSessionResponse {
        success: true,
        session_id,
        expires_at,
    }))
}

/// Earn-credits request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnCreditsRequest {
    pub session_id: Option<String>,
    pub verification: Option<serde_json::Value>,
}

/// Earn-credits response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnCreditsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earned: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_today: Option<i64>,
    pub max_per_day: i64,
}

/// Claim the reward for a completed ad.
///
/// Enforces the daily cap counted since midnight, then validates the ad
/// session (owner, single use, expiry) and credits the wallet through the
/// ledger. The cap is checked before the session is consumed.
pub async fn earn_credits(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<EarnCreditsRequest>,
) -> Result<Json<EarnCreditsResponse>> {
    let user = require_user(&state, &headers).await?;
    let pool = state.db.pool();

    // Cap first: a capped user keeps their unused session instead of
    // burning it on a declined reward.
    let used_today =
        wallet::count_category_since(pool, &user.id, AD_REWARD_CATEGORY, &today_start()).await?;
    if used_today >= state.ad_reward.max_per_day {
        return Ok(Json(EarnCreditsResponse {
            success: false,
            error: Some("limit_reached"),
            earned: None,
            balance: None,
            used_today: Some(used_today),
            max_per_day: state.ad_reward.max_per_day,
        }));
    }

    let mut ad_network = "web_reward".to_string();
    if let Some(session_id) = &body.session_id {
        let session = ad_session::get_ad_session(pool, session_id)
            .await?
            .ok_or(ApiError::BadRequest("invalid_session"))?;

        if session.user_id != user.id {
            return Err(ApiError::Forbidden("invalid_session_owner"));
        }
        if session.used {
            return Err(ApiError::BadRequest("session_used"));
        }
        if session.expires_at < time::now() {
            return Err(ApiError::BadRequest("session_expired"));
        }

        ad_network = session.ad_network;

        // The conditional update loses to a concurrent claim of the same
        // session, in which case the reward was already paid out.
        let marked =
            ad_session::mark_ad_session_used(pool, session_id, body.verification.as_ref()).await?;
        if !marked {
            return Err(ApiError::BadRequest("session_used"));
        }
    }

    let metadata = serde_json::json!({
        "source": ad_network,
        "verification": body.verification,
    });
    let balance = wallet::credit(
        pool,
        &user.id,
        state.ad_reward.credits,
        AD_REWARD_CATEGORY,
        "GLOBAL",
        &format!("{} rewarded ad", ad_network),
        Some(&metadata),
    )
    .await?;

    info!(user_id = %user.id, balance, "Ad reward credited");

    Ok(Json(EarnCreditsResponse {
        success: true,
        error: None,
        earned: Some(state.ad_reward.credits),
        balance: Some(balance),
        used_today: Some(used_today + 1),
        max_per_day: state.ad_reward.max_per_day,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_today_start_precedes_now() {
        let start = today_start();
        assert!(start < time::now());
        assert!(start.ends_with("T00:00:00.000Z"));
    }
}
