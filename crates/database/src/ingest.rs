//! Per-import ingest: fold parsed leads into the store.
//!
//! One call covers one chat export. The whole fold runs inside a single
//! transaction so the duplicate bookkeeping, the import record, and the usage
//! counter never drift apart under concurrent imports for the same owner.

use leads_core::{merge_display_name, ParsedLead, Tier};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::usage;

/// Outcome of one ingest call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    /// Id of the created import record.
    pub import_id: String,
    /// Distinct numbers parsed from the file.
    pub total_count: i64,
    /// Parsed entries that merged into an existing lead instead of creating
    /// a new row.
    pub duplicates_removed: i64,
}

/// Ingest the parsed leads from one chat export.
///
/// Numbers already known for this user update `last_seen`, the import
/// association, and (per the merge rule) the display name. New numbers become
/// new leads. Rejects the import with [`DatabaseError::QuotaExceeded`] when
/// the user's tier has no imports left this month.
pub async fn ingest_parsed(
    pool: &SqlitePool,
    user_id: &str,
    filename: &str,
    parsed: &[ParsedLead],
    tier: Tier,
) -> Result<IngestOutcome> {
    let mut tx = pool.begin().await?;

    let period = usage::current_period();
    if let Some(limit) = tier.limits().imports_per_month {
        let used = usage::imports_used(&mut tx, user_id, &period).await?;
        if used >= limit {
            return Err(DatabaseError::QuotaExceeded {
                resource: "imports",
                limit,
            });
        }
    }

    let import_id = Uuid::new_v4().to_string();
    let mut duplicates_removed = 0i64;

    for lead in parsed {
        let existing = sqlx::query_as::<_, (String, Option<String>)>(
            r#"
            SELECT id, display_name
            FROM leads
            WHERE user_id = ? AND phone_number = ?
            "#,
        )
        .bind(user_id)
        .bind(&lead.phone_number)
        .fetch_optional(&mut *tx)
        .await?;

        match existing {
            Some((id, current_name)) => {
                let merged = merge_display_name(
                    current_name.as_deref(),
                    lead.display_name.as_deref(),
                    &lead.phone_number,
                );
                sqlx::query(
                    r#"
                    UPDATE leads
                    SET last_seen = datetime('now'),
                        import_id = ?,
                        display_name = ?
                    WHERE id = ?
                    "#,
                )
                .bind(&import_id)
                .bind(merged)
                .bind(&id)
                .execute(&mut *tx)
                .await?;
                duplicates_removed += 1;
            }
            None => {
                let first_seen = lead
                    .first_seen
                    .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string());
                sqlx::query(
                    r#"
                    INSERT INTO leads (id, user_id, phone_number, display_name, source_chat,
                                       first_seen, last_seen, import_id)
                    VALUES (?, ?, ?, ?, ?, COALESCE(?, datetime('now')), datetime('now'), ?)
                    "#,
                )
                .bind(Uuid::new_v4().to_string())
                .bind(user_id)
                .bind(&lead.phone_number)
                .bind(&lead.display_name)
                .bind(filename)
                .bind(first_seen)
                .bind(&import_id)
                .execute(&mut *tx)
                .await?;
            }
        }
    }

    let total_count = parsed.len() as i64;
    sqlx::query(
        r#"
        INSERT INTO imports (id, user_id, filename, total_count, duplicates_removed)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&import_id)
    .bind(user_id)
    .bind(filename)
    .bind(total_count)
    .bind(duplicates_removed)
    .execute(&mut *tx)
    .await?;

    usage::record_import(&mut tx, user_id, &period).await?;

    tx.commit().await?;

    tracing::info!(
        user_id,
        filename,
        total_count,
        duplicates_removed,
        "ingested chat export"
    );

    Ok(IngestOutcome {
        import_id,
        total_count,
        duplicates_removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lead::{list_leads, LeadFilter};
    use crate::{import, Database};

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn parsed(phone: &str, name: Option<&str>) -> ParsedLead {
        ParsedLead {
            phone_number: phone.to_string(),
            display_name: name.map(str::to_string),
            first_seen: None,
        }
    }

    #[tokio::test]
    async fn test_first_import_creates_leads() {
        let db = test_db().await;
        let batch = [
            parsed("+2348011111111", Some("Alice")),
            parsed("+2348022222222", None),
        ];

        let outcome = ingest_parsed(db.pool(), "owner", "chat.txt", &batch, Tier::Free)
            .await
            .unwrap();
        assert_eq!(outcome.total_count, 2);
        assert_eq!(outcome.duplicates_removed, 0);

        let page = list_leads(db.pool(), "owner", &LeadFilter { limit: 10, ..Default::default() })
            .await
            .unwrap();
        assert_eq!(page.total, 2);

        let record = import::get_import(db.pool(), "owner", &outcome.import_id)
            .await
            .unwrap();
        assert_eq!(record.filename, "chat.txt");
        assert_eq!(record.total_count, 2);
    }

    #[tokio::test]
    async fn test_reimport_removes_everything_as_duplicates() {
        let db = test_db().await;
        let batch = [
            parsed("+2348011111111", Some("Alice")),
            parsed("+2348022222222", None),
        ];

        ingest_parsed(db.pool(), "owner", "chat.txt", &batch, Tier::Free)
            .await
            .unwrap();
        let second = ingest_parsed(db.pool(), "owner", "chat.txt", &batch, Tier::Free)
            .await
            .unwrap();

        assert_eq!(second.total_count, 2);
        assert_eq!(second.duplicates_removed, 2);

        // No growth in stored leads.
        let page = list_leads(db.pool(), "owner", &LeadFilter { limit: 10, ..Default::default() })
            .await
            .unwrap();
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn test_reimport_updates_import_association() {
        let db = test_db().await;
        let batch = [parsed("+2348011111111", None)];

        ingest_parsed(db.pool(), "owner", "a.txt", &batch, Tier::Free)
            .await
            .unwrap();
        let second = ingest_parsed(db.pool(), "owner", "b.txt", &batch, Tier::Free)
            .await
            .unwrap();

        let page = list_leads(db.pool(), "owner", &LeadFilter { limit: 10, ..Default::default() })
            .await
            .unwrap();
        assert_eq!(page.leads[0].import_id, second.import_id);
        // source_chat keeps the file the lead was first seen in.
        assert_eq!(page.leads[0].source_chat.as_deref(), Some("a.txt"));
    }

    #[tokio::test]
    async fn test_merge_upgrades_phone_shaped_name_only() {
        let db = test_db().await;

        ingest_parsed(
            db.pool(),
            "owner",
            "a.txt",
            &[parsed("+2348011111111", Some("+2348011111111"))],
            Tier::Free,
        )
        .await
        .unwrap();

        ingest_parsed(
            db.pool(),
            "owner",
            "b.txt",
            &[parsed("+2348011111111", Some("Alice"))],
            Tier::Free,
        )
        .await
        .unwrap();

        let page = list_leads(db.pool(), "owner", &LeadFilter { limit: 10, ..Default::default() })
            .await
            .unwrap();
        assert_eq!(page.leads[0].display_name.as_deref(), Some("Alice"));

        // A real name is never degraded back to a number.
        ingest_parsed(
            db.pool(),
            "owner",
            "c.txt",
            &[parsed("+2348011111111", Some("+2348011111111"))],
            Tier::Business,
        )
        .await
        .unwrap();

        let page = list_leads(db.pool(), "owner", &LeadFilter { limit: 10, ..Default::default() })
            .await
            .unwrap();
        assert_eq!(page.leads[0].display_name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_import_quota_is_enforced() {
        let db = test_db().await;
        let batch = [parsed("+2348011111111", None)];

        // Free tier: two imports per month.
        for _ in 0..2 {
            ingest_parsed(db.pool(), "owner", "chat.txt", &batch, Tier::Free)
                .await
                .unwrap();
        }

        let third = ingest_parsed(db.pool(), "owner", "chat.txt", &batch, Tier::Free).await;
        assert!(matches!(third, Err(DatabaseError::QuotaExceeded { .. })));

        // Another owner is unaffected.
        ingest_parsed(db.pool(), "other", "chat.txt", &batch, Tier::Free)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_leads_are_scoped_per_owner() {
        let db = test_db().await;
        let batch = [parsed("+2348011111111", None)];

        ingest_parsed(db.pool(), "a", "chat.txt", &batch, Tier::Free)
            .await
            .unwrap();
        let outcome = ingest_parsed(db.pool(), "b", "chat.txt", &batch, Tier::Free)
            .await
            .unwrap();

        // The same number for a different owner is a new lead, not a dupe.
        assert_eq!(outcome.duplicates_removed, 0);
    }
}
