//! Plan purchase route.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use database::plan;

use crate::error::{ApiError, Result};
use crate::routes::require_user;
use crate::state::AppState;

/// Buy-plan request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyPlanRequest {
    pub plan_code: String,
}

/// Client-side checkout parameters handed to the front end when no
/// server-side pay link can be generated.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineCheckout {
    pub price_id: String,
    pub client_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<String>,
}

/// Buy-plan response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyPlanResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paddle: Option<InlineCheckout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl BuyPlanResponse {
    fn url(url: String) -> Self {
        Self {
            success: true,
            checkout_url: Some(url),
            paddle: None,
            error: None,
        }
    }
}

/// Start a plan purchase.
///
/// Resolution order: a checkout link stored on the plan, a provider-generated
/// pay link when vendor credentials are configured, client-token inline
/// checkout parameters, then a coming-soon fallback.
pub async fn buy_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<BuyPlanRequest>,
) -> Result<Json<BuyPlanResponse>> {
    let user = require_user(&state, &headers).await?;

    let plan = plan::get_plan_by_code(state.db.pool(), &body.plan_code)
        .await?
        .ok_or(ApiError::NotFound("plan_not_found"))?;

    info!(user_id = %user.id, plan_code = %plan.code, "Plan purchase started");

    let features: serde_json::Value = plan
        .features
        .as_deref()
        .and_then(|f| serde_json::from_str(f).ok())
        .unwrap_or_default();

    // A link stored on the plan row wins outright.
    if let Some(link) = features["paddle_link"].as_str() {
        return Ok(Json(BuyPlanResponse::url(link.to_string())));
    }

    let config = state.checkout.config();

    if config.has_vendor_credentials() {
        if let Some(product_id) = feature_string(&features, "paddle_product_id") {
            let passthrough = serde_json::json!({
                "planCode": plan.code,
                "userId": user.id,
            });
            match state.checkout.generate_pay_link(&product_id, &passthrough).await {
                Ok(url) => return Ok(Json(BuyPlanResponse::url(url))),
                Err(e) => {
                    warn!(plan_code = %plan.code, error = %e, "Pay link generation failed");
                    return Ok(Json(BuyPlanResponse {
                        success: false,
                        checkout_url: None,
                        paddle: None,
                        error: Some("paddle_link_error"),
                    }));
                }
            }
        }
    }

    if let Some(client_token) = &config.client_token {
        if let Some(price_id) = feature_string(&features, "paddle_price_id") {
            return Ok(Json(BuyPlanResponse {
                success: true,
                checkout_url: None,
                paddle: Some(InlineCheckout {
                    price_id,
                    client_token: client_token.clone(),
                    environment: config.environment.clone(),
                    seller_id: config.seller_id.clone(),
                }),
                error: None,
            }));
        }
    }

    Ok(Json(BuyPlanResponse::url("/coming-soon.html".to_string())))
}

/// Read a feature value that may be stored as a string or a number.
fn feature_string(features: &serde_json::Value, key: &str) -> Option<String> {
    match &features[key] {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_string_accepts_numbers() {
        let features = serde_json::json!({
            "paddle_product_id": 12345,
            "paddle_price_id": "pri_123",
        });
        assert_eq!(
            feature_string(&features, "paddle_product_id").as_deref(),
            Some("12345")
        );
        assert_eq!(
            feature_string(&features, "paddle_price_id").as_deref(),
            Some("pri_123")
        );
        assert_eq!(feature_string(&features, "missing"), None);
    }
}
