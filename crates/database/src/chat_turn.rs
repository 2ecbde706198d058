//! Conversation store: append-only chat turn persistence.

use chrono::Duration;

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{ChatTurn, NewTurn};
use crate::time;

/// Append one or more turns in a single transaction.
///
/// Turns without an explicit timestamp are assigned monotonically increasing
/// ones (one millisecond apart), so a user-then-character pair always orders
/// user-before-character even when wall clocks would tie. The autoincrement
/// id is the second ordering key for stores with coarser clocks.
pub async fn append_turns(
    pool: &SqlitePool,
    character_id: &str,
    session_id: &str,
    turns: Vec<NewTurn>,
) -> Result<Vec<ChatTurn>> {
    let base = chrono::Utc::now();
    let mut tx = pool.begin().await?;
    let mut persisted = Vec::with_capacity(turns.len());

    for (offset, turn) in turns.into_iter().enumerate() {
        let created_at = turn
            .created_at
            .unwrap_or_else(|| time::format(base + Duration::milliseconds(offset as i64)));

        let result = sqlx::query(
            r#"
            INSERT INTO character_chats
                (character_id, session_id, user_id, role, content, model,
                 input_tokens, output_tokens, credit_spent, metadata, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(character_id)
        .bind(session_id)
        .bind(&turn.user_id)
        .bind(&turn.role)
        .bind(&turn.content)
        .bind(&turn.model)
        .bind(turn.input_tokens)
        .bind(turn.output_tokens)
        .bind(turn.credit_spent)
        .bind(turn.metadata.as_ref().map(|m| m.to_string()))
        .bind(&created_at)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, ChatTurn>(
            r#"
            SELECT id, character_id, session_id, user_id, role, content, model,
                   input_tokens, output_tokens, credit_spent, metadata, created_at
            FROM character_chats
            WHERE id = ?
            "#,
        )
        .bind(result.last_insert_rowid())
        .fetch_one(&mut *tx)
        .await?;

        persisted.push(row);
    }

    tx.commit().await?;
    Ok(persisted)
}

/// Read the most recent `limit` turns for a session, ascending by creation
/// order. Used both as LLM context and as the summarization trigger input.
pub async fn recent_window(
    pool: &SqlitePool,
    character_id: &str,
    session_id: &str,
    limit: i64,
) -> Result<Vec<ChatTurn>> {
    let mut rows = sqlx::query_as::<_, ChatTurn>(
        r#"
        SELECT id, character_id, session_id, user_id, role, content, model,
               input_tokens, output_tokens, credit_spent, metadata, created_at
        FROM character_chats
        WHERE character_id = ? AND session_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(character_id)
    .bind(session_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.reverse();
    Ok(rows)
}

/// List turns for a character, ascending, with optional session and
/// timestamp filters. `limit` is clamped at the HTTP boundary.
pub async fn list_turns(
    pool: &SqlitePool,
    character_id: &str,
    session_id: Option<&str>,
    since: Option<&str>,
    limit: i64,
) -> Result<Vec<ChatTurn>> {
    let rows = sqlx::query_as::<_, ChatTurn>(
        r#"
        SELECT id, character_id, session_id, user_id, role, content, model,
               input_tokens, output_tokens, credit_spent, metadata, created_at
        FROM character_chats
        WHERE character_id = ?
          AND (? IS NULL OR session_id = ?)
          AND (? IS NULL OR created_at > ?)
        ORDER BY created_at ASC, id ASC
        LIMIT ?
        "#,
    )
    .bind(character_id)
    .bind(session_id)
    .bind(session_id)
    .bind(since)
    .bind(since)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Delete turns for a character older than the cutoff timestamp.
/// Returns the number of rows removed.
pub async fn prune_older_than(pool: &SqlitePool, character_id: &str, cutoff: &str) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM character_chats
        WHERE character_id = ? AND created_at < ?
        "#,
    )
    .bind(character_id)
    .bind(cutoff)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Count turns in a session.
pub async fn count_turns(pool: &SqlitePool, character_id: &str, session_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM character_chats
        WHERE character_id = ? AND session_id = ?
        "#,
    )
    .bind(character_id)
    .bind(session_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
