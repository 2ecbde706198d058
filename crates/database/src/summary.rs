//! Rolling conversation summary persistence.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::Summary;
use crate::time;

/// Get the newest summary for a character, if any.
pub async fn latest_summary(pool: &SqlitePool, character_id: &str) -> Result<Option<Summary>> {
    let summary = sqlx::query_as::<_, Summary>(
        r#"
        SELECT id, character_id, summary, session_id, user_id, created_at, updated_at
        FROM character_summaries
        WHERE character_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(character_id)
    .fetch_optional(pool)
    .await?;

    Ok(summary)
}

/// Insert a new summary row.
pub async fn insert_summary(
    pool: &SqlitePool,
    character_id: &str,
    session_id: &str,
    user_id: Option<&str>,
    summary: &str,
) -> Result<()> {
    let now = time::now();
    sqlx::query(
        r#"
        INSERT INTO character_summaries
            (character_id, summary, session_id, user_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(character_id)
    .bind(summary)
    .bind(session_id)
    .bind(user_id)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Replace the text of an existing summary row in place.
pub async fn update_summary(pool: &SqlitePool, id: i64, summary: &str) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE character_summaries
        SET summary = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(summary)
    .bind(time::now())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Count summaries for a character.
pub async fn count_summaries(pool: &SqlitePool, character_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM character_summaries WHERE character_id = ?
        "#,
    )
    .bind(character_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
