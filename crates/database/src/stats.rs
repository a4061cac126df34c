//! Derived statistics over the lead and import stores.
//!
//! Everything here is computed from store state at call time; the only
//! stored counters are the transactional usage records.

use chrono::Utc;
use leads_core::Tier;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{import, usage, Result};

/// Summary counts for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadStats {
    pub total_leads: i64,
    pub unsaved_leads: i64,
    pub saved_leads: i64,
    pub total_imports: i64,
    pub leads_this_month: i64,
    pub subscription_usage: SubscriptionUsage,
}

/// Current-month usage against the user's tier limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionUsage {
    pub tier: String,
    pub imports_used: i64,
    /// `None` means unlimited.
    pub imports_limit: Option<i64>,
    pub contacts_saved: i64,
    /// `None` means unlimited.
    pub contacts_limit: Option<i64>,
}

/// Compute the stats snapshot for a user.
pub async fn lead_stats(pool: &SqlitePool, user_id: &str, tier: Tier) -> Result<LeadStats> {
    let total_leads = count_leads(pool, user_id, None).await?;
    let saved_leads = count_leads(pool, user_id, Some(true)).await?;
    let unsaved_leads = count_leads(pool, user_id, Some(false)).await?;
    let total_imports = import::count_imports(pool, user_id).await?;

    let month_start = Utc::now().format("%Y-%m-01 00:00:00").to_string();
    let leads_this_month = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM leads
        WHERE user_id = ? AND created_at >= ?
        "#,
    )
    .bind(user_id)
    .bind(&month_start)
    .fetch_one(pool)
    .await?;

    let period = usage::current_period();
    let record = usage::get_usage(pool, user_id, &period).await?;
    let (imports_used, contacts_saved) = record
        .map(|r| (r.imports, r.contacts_saved))
        .unwrap_or((0, 0));

    let limits = tier.limits();

    Ok(LeadStats {
        total_leads,
        unsaved_leads,
        saved_leads,
        total_imports,
        leads_this_month,
        subscription_usage: SubscriptionUsage {
            tier: tier.as_str().to_string(),
            imports_used,
            imports_limit: limits.imports_per_month,
            contacts_saved,
            contacts_limit: limits.contacts_per_month,
        },
    })
}

async fn count_leads(pool: &SqlitePool, user_id: &str, is_saved: Option<bool>) -> Result<i64> {
    let count = match is_saved {
        None => {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM leads WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(pool)
                .await?
        }
        Some(flag) => {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM leads WHERE user_id = ? AND is_saved = ?",
            )
            .bind(user_id)
            .bind(flag)
            .fetch_one(pool)
            .await?
        }
    };

    Ok(count)
}
