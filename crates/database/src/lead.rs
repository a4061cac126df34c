//! Lead store operations: queries, bulk save, deletion.

use leads_core::Tier;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Lead;
use crate::usage;

/// Query filter for [`list_leads`].
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    /// Restrict to saved or unsaved leads.
    pub is_saved: Option<bool>,
    /// Case-insensitive substring match over phone number and display name.
    pub search: Option<String>,
    /// Rows to skip.
    pub skip: i64,
    /// Page size.
    pub limit: i64,
}

/// One page of leads plus the total matching count.
#[derive(Debug, Clone)]
pub struct LeadPage {
    pub leads: Vec<Lead>,
    pub total: i64,
}

const LEAD_COLUMNS: &str = "id, user_id, phone_number, display_name, source_chat, \
     first_seen, last_seen, import_id, is_saved, tags, notes, created_at";

/// List a user's leads, newest sighting first.
pub async fn list_leads(pool: &SqlitePool, user_id: &str, filter: &LeadFilter) -> Result<LeadPage> {
    let mut conditions = String::from("user_id = ?");
    if filter.is_saved.is_some() {
        conditions.push_str(" AND is_saved = ?");
    }
    if filter.search.is_some() {
        conditions
            .push_str(r" AND (phone_number LIKE ? ESCAPE '\' OR display_name LIKE ? ESCAPE '\')");
    }

    let page_sql = format!(
        "SELECT {LEAD_COLUMNS} FROM leads WHERE {conditions} \
         ORDER BY last_seen DESC, id LIMIT ? OFFSET ?"
    );
    let count_sql = format!("SELECT COUNT(*) FROM leads WHERE {conditions}");

    let pattern = filter
        .search
        .as_deref()
        .map(|s| format!("%{}%", escape_like(s.trim())));

    let mut page_query = sqlx::query_as::<_, Lead>(&page_sql).bind(user_id);
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(user_id);
    if let Some(is_saved) = filter.is_saved {
        page_query = page_query.bind(is_saved);
        count_query = count_query.bind(is_saved);
    }
    if let Some(pattern) = &pattern {
        page_query = page_query.bind(pattern).bind(pattern);
        count_query = count_query.bind(pattern).bind(pattern);
    }

    let leads = page_query
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(pool)
        .await?;
    let total = count_query.fetch_one(pool).await?;

    Ok(LeadPage { leads, total })
}

/// Escape `%`, `_`, and `\` so a search term matches literally in `LIKE`.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Get a single lead, verifying ownership.
pub async fn get_lead(pool: &SqlitePool, user_id: &str, id: &str) -> Result<Lead> {
    let sql = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?");
    let lead = sqlx::query_as::<_, Lead>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Lead",
            id: id.to_string(),
        })?;

    if lead.user_id != user_id {
        return Err(DatabaseError::Forbidden {
            entity: "Lead",
            id: id.to_string(),
        });
    }

    Ok(lead)
}

/// Fetch the given leads that exist and belong to the user.
///
/// Missing or foreign ids are skipped; bulk operations tolerate a lead
/// disappearing between selection and action.
pub async fn get_many(pool: &SqlitePool, user_id: &str, ids: &[String]) -> Result<Vec<Lead>> {
    let sql = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ? AND user_id = ?");
    let mut leads = Vec::with_capacity(ids.len());
    for id in ids {
        let lead = sqlx::query_as::<_, Lead>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
        if let Some(lead) = lead {
            leads.push(lead);
        }
    }
    Ok(leads)
}

/// Mark the given leads as saved.
///
/// Only rows owned by the user and not already saved are flipped, so the
/// operation is idempotent and the returned count reflects newly-flipped rows
/// only. The user's monthly contacts-saved usage is bumped in the same
/// transaction; exceeding the tier cap rolls everything back.
pub async fn bulk_mark_saved(
    pool: &SqlitePool,
    user_id: &str,
    ids: &[String],
    tier: Tier,
) -> Result<u64> {
    let mut tx = pool.begin().await?;
    let mut updated = 0u64;

    for id in ids {
        let result = sqlx::query(
            r#"
            UPDATE leads
            SET is_saved = 1
            WHERE id = ? AND user_id = ? AND is_saved = 0
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        updated += result.rows_affected();
    }

    if updated > 0 {
        let period = usage::current_period();
        if let Some(limit) = tier.limits().contacts_per_month {
            let already_saved = usage::contacts_saved(&mut tx, user_id, &period).await?;
            if already_saved + updated as i64 > limit {
                return Err(DatabaseError::QuotaExceeded {
                    resource: "contacts_saved",
                    limit,
                });
            }
        }
        usage::record_contacts_saved(&mut tx, user_id, &period, updated as i64).await?;
    }

    tx.commit().await?;

    tracing::info!(user_id, updated, "marked leads as saved");
    Ok(updated)
}

/// Permanently delete a lead, verifying ownership first.
pub async fn delete_lead(pool: &SqlitePool, user_id: &str, id: &str) -> Result<()> {
    // Ownership check doubles as the existence check.
    get_lead(pool, user_id, id).await?;

    sqlx::query("DELETE FROM leads WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}
