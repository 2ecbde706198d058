//! Character CRUD operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Character;

/// Create a new character.
pub async fn create_character(pool: &SqlitePool, character: &Character) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO characters (id, name, prompt, intro, is_public, creator_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&character.id)
    .bind(&character.name)
    .bind(&character.prompt)
    .bind(&character.intro)
    .bind(character.is_public)
    .bind(&character.creator_id)
    .bind(&character.created_at)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Character",
                    id: character.id.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Get a character by id.
pub async fn get_character(pool: &SqlitePool, id: &str) -> Result<Character> {
    sqlx::query_as::<_, Character>(
        r#"
        SELECT id, name, prompt, intro, is_public, creator_id, created_at
        FROM characters
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Character",
        id: id.to_string(),
    })
}

/// List publicly visible characters.
pub async fn list_public_characters(pool: &SqlitePool) -> Result<Vec<Character>> {
    let characters = sqlx::query_as::<_, Character>(
        r#"
        SELECT id, name, prompt, intro, is_public, creator_id, created_at
        FROM characters
        WHERE is_public = 1
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(characters)
}
