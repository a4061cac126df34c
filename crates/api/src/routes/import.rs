//! Chat-export upload and parsing.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use base64::Engine;
use leads_core::ParsedLead;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{authorize, resolve_owner};
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Uploaded chat export. Content travels base64-encoded.
#[derive(Deserialize)]
pub struct ParseRequest {
    pub filename: String,
    pub content: String,
}

/// Parse-and-ingest result.
#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub import_id: String,
    pub leads: Vec<ParsedLead>,
    pub total_count: i64,
    pub duplicates_removed: i64,
}

/// Parse an uploaded WhatsApp chat export and ingest the extracted leads.
pub async fn parse_import(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ParseRequest>,
) -> Result<Json<ParseResponse>> {
    authorize(&state.config, &headers)?;
    let owner = resolve_owner(&state.config, &headers);

    let filename = req.filename.trim();
    if filename.is_empty() {
        return Err(ApiError::Validation("filename must not be empty".to_string()));
    }

    let raw = base64::engine::general_purpose::STANDARD
        .decode(req.content.trim())
        .map_err(|_| ApiError::Validation("content is not valid base64".to_string()))?;
    let content = String::from_utf8(raw)
        .map_err(|_| ApiError::Validation("content is not valid UTF-8".to_string()))?;

    let leads = parser::parse_chat(&content, &state.config.default_country_code)?;

    let outcome = database::ingest::ingest_parsed(
        state.db.pool(),
        &owner,
        filename,
        &leads,
        state.config.tier,
    )
    .await?;

    info!(
        owner = %owner,
        filename,
        total = outcome.total_count,
        duplicates = outcome.duplicates_removed,
        "parsed chat export"
    );

    Ok(Json(ParseResponse {
        import_id: outcome.import_id,
        leads,
        total_count: outcome.total_count,
        duplicates_removed: outcome.duplicates_removed,
    }))
}
