//! Monthly usage counters for subscription enforcement.
//!
//! Usage is a per-(user, month) row bumped transactionally alongside the
//! operation it accounts for, never an in-memory counter.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::models::UsageRecord;
use crate::Result;

/// The current calendar month as `YYYY-MM`.
pub fn current_period() -> String {
    Utc::now().format("%Y-%m").to_string()
}

/// Get the usage record for a user and period, if one exists.
pub async fn get_usage(
    pool: &SqlitePool,
    user_id: &str,
    period: &str,
) -> Result<Option<UsageRecord>> {
    let record = sqlx::query_as::<_, UsageRecord>(
        r#"
        SELECT user_id, period, imports, contacts_saved, updated_at
        FROM usage_records
        WHERE user_id = ? AND period = ?
        "#,
    )
    .bind(user_id)
    .bind(period)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Imports consumed by a user in a period. Zero when no record exists.
pub async fn imports_used(
    conn: &mut SqliteConnection,
    user_id: &str,
    period: &str,
) -> Result<i64> {
    let used = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT imports
        FROM usage_records
        WHERE user_id = ? AND period = ?
        "#,
    )
    .bind(user_id)
    .bind(period)
    .fetch_optional(&mut *conn)
    .await?
    .unwrap_or(0);

    Ok(used)
}

/// Contacts saved by a user in a period. Zero when no record exists.
pub async fn contacts_saved(
    conn: &mut SqliteConnection,
    user_id: &str,
    period: &str,
) -> Result<i64> {
    let saved = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT contacts_saved
        FROM usage_records
        WHERE user_id = ? AND period = ?
        "#,
    )
    .bind(user_id)
    .bind(period)
    .fetch_optional(&mut *conn)
    .await?
    .unwrap_or(0);

    Ok(saved)
}

/// Count one import against the user's current period.
pub async fn record_import(
    conn: &mut SqliteConnection,
    user_id: &str,
    period: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO usage_records (user_id, period, imports, contacts_saved)
        VALUES (?, ?, 1, 0)
        ON CONFLICT(user_id, period) DO UPDATE SET
            imports = imports + 1,
            updated_at = datetime('now')
        "#,
    )
    .bind(user_id)
    .bind(period)
    .execute(conn)
    .await?;

    Ok(())
}

/// Count saved contacts against the user's current period.
pub async fn record_contacts_saved(
    conn: &mut SqliteConnection,
    user_id: &str,
    period: &str,
    count: i64,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO usage_records (user_id, period, imports, contacts_saved)
        VALUES (?, ?, 0, ?)
        ON CONFLICT(user_id, period) DO UPDATE SET
            contacts_saved = contacts_saved + excluded.contacts_saved,
            updated_at = datetime('now')
        "#,
    )
    .bind(user_id)
    .bind(period)
    .bind(count)
    .execute(conn)
    .await?;

    Ok(())
}
