//! SQLite persistence layer for the lead manager.
//!
//! This crate provides async storage for leads, imports, and monthly usage
//! records using SQLx with SQLite, plus the ingest transaction that folds
//! parsed chat exports into the store.
//!
//! # Example
//!
//! ```no_run
//! use database::{ingest, Database};
//! use leads_core::{ParsedLead, Tier};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:leads.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let parsed = vec![ParsedLead::new("+2348011111111")];
//!     let outcome =
//!         ingest::ingest_parsed(db.pool(), "owner", "chat.txt", &parsed, Tier::Free).await?;
//!     println!("imported {} leads", outcome.total_count);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod import;
pub mod ingest;
pub mod lead;
pub mod models;
pub mod stats;
pub mod usage;

pub use error::{DatabaseError, Result};
pub use ingest::IngestOutcome;
pub use lead::{LeadFilter, LeadPage};
pub use models::{Import, Lead, UsageRecord};
pub use stats::{LeadStats, SubscriptionUsage};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    /// Requests are independent; the pool only needs to cover concurrent
    /// API calls.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist, or
    /// `sqlite::memory:` for tests.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check that the database answers queries.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
