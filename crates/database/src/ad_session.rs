//! Rewarded-ad session persistence.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::AdSession;
use crate::time;

/// Create an ad session.
pub async fn create_ad_session(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    ad_network: &str,
    expires_at: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO ad_sessions (id, user_id, ad_network, created_at, expires_at, used)
        VALUES (?, ?, ?, ?, ?, 0)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(ad_network)
    .bind(time::now())
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get an ad session by id.
pub async fn get_ad_session(pool: &SqlitePool, id: &str) -> Result<Option<AdSession>> {
    let session = sqlx::query_as::<_, AdSession>(
        r#"
        SELECT id, user_id, ad_network, created_at, expires_at, used, used_at, verification
        FROM ad_sessions
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

/// Mark an ad session used. Conditional on the session being unused, so a
/// replayed claim cannot collect the reward twice. Returns false when the
/// session was already consumed.
pub async fn mark_ad_session_used(
    pool: &SqlitePool,
    id: &str,
    verification: Option<&serde_json::Value>,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE ad_sessions
        SET used = 1, used_at = ?, verification = ?
        WHERE id = ? AND used = 0
        "#,
    )
    .bind(time::now())
    .bind(verification.map(|v| v.to_string()))
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
