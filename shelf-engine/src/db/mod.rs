//! Result store
//!
//! Two tables hold serialized payloads: one row per reader and one row per
//! unordered reader pair. Every write replaces the whole row inside a
//! transaction, so readers never observe a half-written result.

pub mod comparisons;
pub mod profiles;

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use shelf_common::{Error, Result};
use sqlx::SqlitePool;

/// Open (creating if needed) the database file and ensure tables exist
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;
    init_tables(&pool).await?;

    Ok(pool)
}

/// Create the result tables if they don't exist
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            reader_id TEXT PRIMARY KEY,
            reader_name TEXT,
            book_count INTEGER NOT NULL,
            payload_json TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS comparisons (
            reader_a TEXT NOT NULL,
            reader_b TEXT NOT NULL,
            payload_json TEXT NOT NULL,
            created_at TEXT NOT NULL,
            PRIMARY KEY (reader_a, reader_b)
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (profiles, comparisons)");

    Ok(())
}

/// Fixed-width UTC timestamp so text ordering matches time ordering
pub(crate) fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Failed to parse timestamp {:?}: {}", value, e)))
}
