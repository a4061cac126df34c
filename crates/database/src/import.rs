//! Import record queries.
//!
//! Import rows are created inside the ingest transaction; this module covers
//! reads.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Import;

/// Get one import record, verifying ownership.
pub async fn get_import(pool: &SqlitePool, user_id: &str, id: &str) -> Result<Import> {
    let record = sqlx::query_as::<_, Import>(
        r#"
        SELECT id, user_id, filename, total_count, duplicates_removed, status, created_at
        FROM imports
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Import",
        id: id.to_string(),
    })?;

    if record.user_id != user_id {
        return Err(DatabaseError::Forbidden {
            entity: "Import",
            id: id.to_string(),
        });
    }

    Ok(record)
}

/// Count a user's imports.
pub async fn count_imports(pool: &SqlitePool, user_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM imports
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
