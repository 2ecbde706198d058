//! Wallet ledger operations.
//!
//! The wallet row mirrors the sum of the user's credit transactions. A debit
//! is a conditional update (`balance >= amount`) executed in the same SQL
//! transaction as the ledger insert, so concurrent spends cannot both pass a
//! stale balance check.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{CreditTransaction, TxType, Wallet, WalletBalance};
use crate::time;

/// Get the wallet row for a user, if one exists.
pub async fn get_wallet(pool: &SqlitePool, user_id: &str) -> Result<Option<Wallet>> {
    let wallet = sqlx::query_as::<_, Wallet>(
        r#"
        SELECT user_id, balance, lifetime_used, updated_at
        FROM credit_wallets
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(wallet)
}

/// Get a user's balance. A missing wallet row is not an error; it reads as
/// zero balance and zero lifetime use.
pub async fn get_balance(pool: &SqlitePool, user_id: &str) -> Result<WalletBalance> {
    let balance = get_wallet(pool, user_id)
        .await?
        .map(|w| WalletBalance {
            balance: w.balance,
            lifetime_used: w.lifetime_used,
        })
        .unwrap_or_default();

    Ok(balance)
}

/// Rebuild the wallet row from the transaction ledger and return the
/// reconciled balance. Used to self-heal a missing or drifted wallet before
/// a spend decision.
pub async fn reconcile_from_transactions(pool: &SqlitePool, user_id: &str) -> Result<i64> {
    let balance = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(amount), 0)
        FROM credit_transactions
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let spent = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(-amount), 0)
        FROM credit_transactions
        WHERE user_id = ? AND amount < 0
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO credit_wallets (user_id, balance, lifetime_used, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            balance = excluded.balance,
            lifetime_used = excluded.lifetime_used,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(user_id)
    .bind(balance)
    .bind(spent)
    .bind(time::now())
    .execute(pool)
    .await?;

    tracing::info!(user_id, balance, "Reconciled wallet from transactions");
    Ok(balance)
}

/// Debit a wallet and append the matching ledger entry atomically.
///
/// Returns the new balance, or [`DatabaseError::InsufficientFunds`] when the
/// conditional update matches no row (missing wallet or short balance).
pub async fn debit(
    pool: &SqlitePool,
    user_id: &str,
    amount: i64,
    category: &str,
    service_code: &str,
    description: &str,
    metadata: Option<&serde_json::Value>,
) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        r#"
        UPDATE credit_wallets
        SET balance = balance - ?, lifetime_used = lifetime_used + ?, updated_at = ?
        WHERE user_id = ? AND balance >= ?
        "#,
    )
    .bind(amount)
    .bind(amount)
    .bind(time::now())
    .bind(user_id)
    .bind(amount)
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        let balance = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE((SELECT balance FROM credit_wallets WHERE user_id = ?), 0)
            "#,
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        return Err(DatabaseError::InsufficientFunds {
            required: amount,
            balance,
        });
    }

    let new_balance = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT balance FROM credit_wallets WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    insert_transaction(
        &mut tx,
        user_id,
        TxType::Usage,
        category,
        service_code,
        -amount,
        new_balance,
        description,
        metadata,
    )
    .await?;

    tx.commit().await?;
    Ok(new_balance)
}

/// Credit a wallet and append the matching ledger entry atomically.
///
/// Creates the wallet row if it does not exist. Daily caps on rewarded
/// categories are enforced by the caller via [`count_category_since`].
pub async fn credit(
    pool: &SqlitePool,
    user_id: &str,
    amount: i64,
    category: &str,
    service_code: &str,
    description: &str,
    metadata: Option<&serde_json::Value>,
) -> Result<i64> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO credit_wallets (user_id, balance, lifetime_used, updated_at)
        VALUES (?, ?, 0, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            balance = balance + excluded.balance,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(user_id)
    .bind(amount)
    .bind(time::now())
    .execute(&mut *tx)
    .await?;

    let new_balance = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT balance FROM credit_wallets WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    insert_transaction(
        &mut tx,
        user_id,
        TxType::Charge,
        category,
        service_code,
        amount,
        new_balance,
        description,
        metadata,
    )
    .await?;

    tx.commit().await?;
    Ok(new_balance)
}

/// Count a user's transactions in a category since a cutoff timestamp.
pub async fn count_category_since(
    pool: &SqlitePool,
    user_id: &str,
    category: &str,
    since: &str,
) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM credit_transactions
        WHERE user_id = ? AND category = ? AND occurred_at >= ?
        "#,
    )
    .bind(user_id)
    .bind(category)
    .bind(since)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// List a user's transactions, newest first.
pub async fn list_transactions(pool: &SqlitePool, user_id: &str) -> Result<Vec<CreditTransaction>> {
    let rows = sqlx::query_as::<_, CreditTransaction>(
        r#"
        SELECT id, user_id, tx_type, category, service_code, amount,
               balance_after, description, metadata, occurred_at
        FROM credit_transactions
        WHERE user_id = ?
        ORDER BY occurred_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[allow(clippy::too_many_arguments)]
async fn insert_transaction(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    user_id: &str,
    tx_type: TxType,
    category: &str,
    service_code: &str,
    amount: i64,
    balance_after: i64,
    description: &str,
    metadata: Option<&serde_json::Value>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO credit_transactions
            (user_id, tx_type, category, service_code, amount, balance_after,
             description, metadata, occurred_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(tx_type.as_str())
    .bind(category)
    .bind(service_code)
    .bind(amount)
    .bind(balance_after)
    .bind(description)
    .bind(metadata.map(|m| m.to_string()))
    .bind(time::now())
    .execute(&mut **tx)
    .await?;

    Ok(())
}
