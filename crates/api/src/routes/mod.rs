//! Route handlers for the lead manager API.

pub mod health;
pub mod import;
pub mod leads;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/import/parse", post(import::parse_import))
        .route("/api/leads", get(leads::list_leads))
        .route("/api/leads/stats", get(leads::stats))
        .route("/api/leads/bulk-save", post(leads::bulk_save))
        .route("/api/leads/export-vcf", post(leads::export_vcf))
        .route("/api/leads/:id", delete(leads::delete_lead))
}
