//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A deduplicated contact record derived from chat exports.
///
/// Identity is the (user_id, phone_number) pair; re-imports of the same
/// number update the existing row instead of creating a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Lead {
    /// UUID.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Normalized phone number (E.164-style).
    pub phone_number: String,
    /// Display name, if any sighting carried one.
    pub display_name: Option<String>,
    /// Filename of the chat export the lead was first seen in.
    pub source_chat: Option<String>,
    /// Timestamp of the first sighting.
    pub first_seen: String,
    /// Timestamp of the most recent sighting.
    pub last_seen: String,
    /// Import that most recently touched this lead.
    pub import_id: String,
    /// Whether the lead has been saved to device contacts.
    pub is_saved: bool,
    /// Free-form tags, stored as a JSON array.
    pub tags: String,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Row creation timestamp.
    pub created_at: String,
}

/// One parse-and-ingest operation over a single chat export file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Import {
    /// UUID.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Originating filename.
    pub filename: String,
    /// Distinct numbers parsed from the file.
    pub total_count: i64,
    /// Parsed entries that merged into existing leads.
    pub duplicates_removed: i64,
    /// Processing status.
    pub status: String,
    /// Row creation timestamp.
    pub created_at: String,
}

/// Monthly usage counters for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UsageRecord {
    /// Owning user.
    pub user_id: String,
    /// Calendar month, `YYYY-MM`.
    pub period: String,
    /// Imports consumed this month.
    pub imports: i64,
    /// Contacts saved this month.
    pub contacts_saved: i64,
    /// Last update timestamp.
    pub updated_at: String,
}
