//! Credit plan lookups.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::Plan;

/// List plans currently offered for purchase.
pub async fn list_active_plans(pool: &SqlitePool) -> Result<Vec<Plan>> {
    let plans = sqlx::query_as::<_, Plan>(
        r#"
        SELECT id, code, name, description, price_cents, features, is_active
        FROM plans
        WHERE is_active = 1
        ORDER BY price_cents
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(plans)
}

/// Get a plan by its stable code.
pub async fn get_plan_by_code(pool: &SqlitePool, code: &str) -> Result<Option<Plan>> {
    let plan = sqlx::query_as::<_, Plan>(
        r#"
        SELECT id, code, name, description, price_cents, features, is_active
        FROM plans
        WHERE code = ?
        "#,
    )
    .bind(code)
    .fetch_optional(pool)
    .await?;

    Ok(plan)
}

/// Insert a plan. Used by seeding and tests.
pub async fn create_plan(pool: &SqlitePool, plan: &Plan) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO plans (id, code, name, description, price_cents, features, is_active)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&plan.id)
    .bind(&plan.code)
    .bind(&plan.name)
    .bind(&plan.description)
    .bind(plan.price_cents)
    .bind(&plan.features)
    .bind(plan.is_active)
    .execute(pool)
    .await?;

    Ok(())
}
