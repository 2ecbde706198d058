//! Character and chat-log read routes.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use database::{character, chat_turn, Character, ChatTurn};

use crate::error::{ApiError, Result};
use crate::state::AppState;

const DEFAULT_CHAT_LIMIT: i64 = 50;
const MAX_CHAT_LIMIT: i64 = 200;

/// List publicly visible characters.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Character>>> {
    let characters = character::list_public_characters(state.db.pool()).await?;
    Ok(Json(characters))
}

/// Fetch one character.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Character>> {
    let character = character::get_character(state.db.pool(), &id)
        .await
        .map_err(|e| match e {
            database::DatabaseError::NotFound { .. } => ApiError::NotFound("not found"),
            other => ApiError::Database(other),
        })?;

    Ok(Json(character))
}

/// Chat-log query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatLogQuery {
    pub session_id: Option<String>,
    pub since: Option<String>,
    pub limit: Option<i64>,
}

/// List chat turns for a character, ascending by creation order.
pub async fn chat_log(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ChatLogQuery>,
) -> Result<Json<Vec<ChatTurn>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_CHAT_LIMIT)
        .clamp(1, MAX_CHAT_LIMIT);

    let turns = chat_turn::list_turns(
        state.db.pool(),
        &id,
        query.session_id.as_deref(),
        query.since.as_deref(),
        limit,
    )
    .await?;

    Ok(Json(turns))
}
