//! Lead queries, bulk save, VCF export, stats, deletion.

use std::fmt;
use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use base64::Engine;
use database::{lead, Lead, LeadFilter, LeadStats};
use leads_core::{vcf, VcardEntry};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::auth::{authorize, resolve_owner};
use crate::error::{ApiError, Result};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 100;
const MAX_PAGE_SIZE: i64 = 500;

/// Query parameters for the lead list.
///
/// Clients send unused parameters as empty strings (`?is_saved=&search=`),
/// which deserialize as absent.
#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub is_saved: Option<bool>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub skip: Option<i64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<i64>,
}

/// Treat a missing or empty query value as `None`.
fn empty_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

/// A lead as returned on the wire. Tags unfold from their stored JSON form.
#[derive(Serialize)]
pub struct LeadDto {
    pub id: String,
    pub phone_number: String,
    pub display_name: Option<String>,
    pub source_chat: Option<String>,
    pub first_seen: String,
    pub last_seen: String,
    pub import_id: String,
    pub is_saved: bool,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

impl From<Lead> for LeadDto {
    fn from(lead: Lead) -> Self {
        let tags = serde_json::from_str(&lead.tags).unwrap_or_default();
        Self {
            id: lead.id,
            phone_number: lead.phone_number,
            display_name: lead.display_name,
            source_chat: lead.source_chat,
            first_seen: lead.first_seen,
            last_seen: lead.last_seen,
            import_id: lead.import_id,
            is_saved: lead.is_saved,
            tags,
            notes: lead.notes,
            created_at: lead.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct ListResponse {
    pub leads: Vec<LeadDto>,
    pub total: i64,
    pub skip: i64,
    pub limit: i64,
}

#[derive(Deserialize)]
pub struct BulkSaveRequest {
    pub lead_ids: Vec<String>,
}

#[derive(Serialize)]
pub struct BulkSaveResponse {
    pub success: bool,
    pub updated_count: u64,
}

#[derive(Deserialize)]
pub struct ExportVcfRequest {
    pub lead_ids: Vec<String>,
}

#[derive(Serialize)]
pub struct ExportVcfResponse {
    pub success: bool,
    /// Base64-encoded vCard text.
    pub vcf_content: String,
    pub count: usize,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// List leads with optional filtering, newest sighting first.
pub async fn list_leads(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>> {
    authorize(&state.config, &headers)?;
    let owner = resolve_owner(&state.config, &headers);

    let skip = query.skip.unwrap_or(0);
    if skip < 0 {
        return Err(ApiError::Validation("skip must not be negative".to_string()));
    }
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let filter = LeadFilter {
        is_saved: query.is_saved,
        search: query.search,
        skip,
        limit,
    };
    let page = lead::list_leads(state.db.pool(), &owner, &filter).await?;

    Ok(Json(ListResponse {
        leads: page.leads.into_iter().map(LeadDto::from).collect(),
        total: page.total,
        skip,
        limit,
    }))
}

/// Mark leads as saved; the actual contact write happens on the device.
pub async fn bulk_save(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<BulkSaveRequest>,
) -> Result<Json<BulkSaveResponse>> {
    authorize(&state.config, &headers)?;
    let owner = resolve_owner(&state.config, &headers);

    if req.lead_ids.is_empty() {
        return Err(ApiError::Validation("lead_ids must not be empty".to_string()));
    }

    let updated_count =
        lead::bulk_mark_saved(state.db.pool(), &owner, &req.lead_ids, state.config.tier).await?;

    info!(owner = %owner, updated_count, "bulk save");

    Ok(Json(BulkSaveResponse {
        success: true,
        updated_count,
    }))
}

/// Generate vCard content for the selected leads.
pub async fn export_vcf(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ExportVcfRequest>,
) -> Result<Json<ExportVcfResponse>> {
    authorize(&state.config, &headers)?;
    let owner = resolve_owner(&state.config, &headers);

    if req.lead_ids.is_empty() {
        return Err(ApiError::Validation("lead_ids must not be empty".to_string()));
    }

    let leads = lead::get_many(state.db.pool(), &owner, &req.lead_ids).await?;
    if leads.is_empty() {
        return Err(ApiError::NotFound("no matching leads to export".to_string()));
    }

    let entries: Vec<VcardEntry> = leads
        .into_iter()
        .map(|lead| VcardEntry {
            display_name: lead.display_name,
            phone_number: lead.phone_number,
        })
        .collect();
    let count = entries.len();
    let content = vcf::render(&entries)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(content);

    info!(owner = %owner, count, "exported vcf");

    Ok(Json(ExportVcfResponse {
        success: true,
        vcf_content: encoded,
        count,
    }))
}

/// Lead statistics and current subscription usage.
pub async fn stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LeadStats>> {
    authorize(&state.config, &headers)?;
    let owner = resolve_owner(&state.config, &headers);

    let snapshot = database::stats::lead_stats(state.db.pool(), &owner, state.config.tier).await?;
    Ok(Json(snapshot))
}

/// Permanently delete a lead.
pub async fn delete_lead(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    authorize(&state.config, &headers)?;
    let owner = resolve_owner(&state.config, &headers);

    lead::delete_lead(state.db.pool(), &owner, &id).await?;

    info!(owner = %owner, id = %id, "deleted lead");

    Ok(Json(DeleteResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_query_values_deserialize_as_absent() {
        let query: ListQuery = serde_json::from_value(json!({
            "is_saved": "", "search": "", "skip": "", "limit": ""
        }))
        .unwrap();
        assert!(query.is_saved.is_none());
        assert!(query.search.is_none());
        assert!(query.skip.is_none());
        assert!(query.limit.is_none());

        let query: ListQuery = serde_json::from_value(json!({
            "is_saved": "true", "search": "alice", "skip": "10", "limit": "25"
        }))
        .unwrap();
        assert_eq!(query.is_saved, Some(true));
        assert_eq!(query.search.as_deref(), Some("alice"));
        assert_eq!(query.skip, Some(10));
        assert_eq!(query.limit, Some(25));
    }

    fn sample_lead(tags: &str) -> Lead {
        Lead {
            id: "id".to_string(),
            user_id: "owner".to_string(),
            phone_number: "+2348011111111".to_string(),
            display_name: Some("Alice".to_string()),
            source_chat: None,
            first_seen: "2024-03-12 14:05:33".to_string(),
            last_seen: "2024-03-12 14:05:33".to_string(),
            import_id: "imp".to_string(),
            is_saved: false,
            tags: tags.to_string(),
            notes: None,
            created_at: "2024-03-12 14:05:33".to_string(),
        }
    }

    #[test]
    fn test_lead_dto_unfolds_tags() {
        let dto = LeadDto::from(sample_lead(r#"["vip","lagos"]"#));
        assert_eq!(dto.tags, vec!["vip", "lagos"]);

        // Unreadable stored tags degrade to an empty list, not an error.
        let dto = LeadDto::from(sample_lead("not json"));
        assert!(dto.tags.is_empty());
    }
}

