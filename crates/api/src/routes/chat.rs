//! The chat turn route.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use database::ChatTurn;
use orchestrator::TurnRequest;

use crate::error::{ApiError, Result};
use crate::routes::bearer_token;
use crate::state::AppState;

/// Chat request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

/// Credits spent on a turn and the balance left after it.
#[derive(Debug, Serialize)]
pub struct CreditInfo {
    pub spent: i64,
    pub balance: i64,
}

/// Chat response: both persisted turns plus the post-debit balance.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub user_message: ChatTurn,
    pub character_message: ChatTurn,
    pub credit: CreditInfo,
}

/// Run one credit-metered chat turn.
pub async fn send(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    if body.session_id.is_empty() || body.message.is_empty() {
        return Err(ApiError::BadRequest("sessionId and message are required"));
    }

    let outcome = state
        .orchestrator
        .process(TurnRequest {
            character_id: id,
            session_id: body.session_id,
            bearer_token: bearer_token(&headers).to_string(),
            message: body.message,
        })
        .await?;

    Ok(Json(ChatResponse {
        user_message: outcome.user_turn,
        character_message: outcome.character_turn,
        credit: CreditInfo {
            spent: outcome.spent,
            balance: outcome.balance,
        },
    }))
}
