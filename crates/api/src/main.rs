//! REST API for the chat-import lead manager.
//!
//! Exposes parse/ingest, lead queries, bulk save, VCF export, stats, and
//! deletion over JSON, backed by the SQLite lead store.

mod auth;
mod config;
mod error;
mod routes;
mod state;

use database::Database;
use tracing::info;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, tier = %config.tier, "Starting lead manager API");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Build application state
    let addr = config.addr;
    let state = AppState::new(db, config);

    // Build router
    let app = routes::router().with_state(state);

    // Start server
    info!(%addr, "Lead manager API listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
