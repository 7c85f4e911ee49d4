//! Comparison rows
//!
//! A pair is stored once regardless of order: writing (b, a) replaces an
//! existing (a, b) row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shelf_common::Result;
use sqlx::{Row, SqliteConnection, SqlitePool};

use super::profiles::write_profile;
use super::{parse_timestamp, timestamp};
use crate::payload::{ComparisonPayload, ProfilePayload};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredComparison {
    pub reader_a: String,
    pub reader_b: String,
    pub created_at: DateTime<Utc>,
    pub payload: ComparisonPayload,
}

/// Listing row for recent comparisons, without the payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub reader_a: String,
    pub reader_b: String,
    pub created_at: DateTime<Utc>,
}

/// Insert or fully replace the comparison for this pair
pub async fn upsert_comparison(pool: &SqlitePool, payload: &ComparisonPayload) -> Result<()> {
    let mut tx = pool.begin().await?;
    write_comparison(&mut *tx, payload, Utc::now()).await?;
    tx.commit().await?;

    tracing::info!(
        reader_a = %payload.reader_a,
        reader_b = %payload.reader_b,
        "Comparison stored"
    );
    Ok(())
}

/// Both profiles and their comparison in one transaction
pub async fn store_comparison_bundle(
    pool: &SqlitePool,
    profile_a: &ProfilePayload,
    profile_b: &ProfilePayload,
    comparison: &ComparisonPayload,
) -> Result<()> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;
    write_profile(&mut *tx, profile_a, now).await?;
    write_profile(&mut *tx, profile_b, now).await?;
    write_comparison(&mut *tx, comparison, now).await?;
    tx.commit().await?;

    tracing::info!(
        reader_a = %comparison.reader_a,
        reader_b = %comparison.reader_b,
        "Comparison bundle stored"
    );
    Ok(())
}

async fn write_comparison(
    conn: &mut SqliteConnection,
    payload: &ComparisonPayload,
    at: DateTime<Utc>,
) -> Result<()> {
    payload.validate()?;
    let payload_json = serde_json::to_string(payload)?;

    sqlx::query("DELETE FROM comparisons WHERE reader_a = ? AND reader_b = ?")
        .bind(&payload.reader_b)
        .bind(&payload.reader_a)
        .execute(&mut *conn)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO comparisons (reader_a, reader_b, payload_json, created_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(reader_a, reader_b) DO UPDATE SET
            payload_json = excluded.payload_json,
            created_at = excluded.created_at
        "#,
    )
    .bind(&payload.reader_a)
    .bind(&payload.reader_b)
    .bind(&payload_json)
    .bind(timestamp(at))
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Comparison for the pair in either order
pub async fn get_comparison(
    pool: &SqlitePool,
    reader_a: &str,
    reader_b: &str,
) -> Result<Option<StoredComparison>> {
    let row = sqlx::query(
        r#"
        SELECT reader_a, reader_b, payload_json, created_at
        FROM comparisons
        WHERE (reader_a = ? AND reader_b = ?) OR (reader_a = ? AND reader_b = ?)
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(reader_a)
    .bind(reader_b)
    .bind(reader_b)
    .bind(reader_a)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let payload_json: String = row.get("payload_json");
            let created_at: String = row.get("created_at");
            Ok(Some(StoredComparison {
                reader_a: row.get("reader_a"),
                reader_b: row.get("reader_b"),
                created_at: parse_timestamp(&created_at)?,
                payload: serde_json::from_str(&payload_json)?,
            }))
        }
        None => Ok(None),
    }
}

/// Most recently written comparisons first
pub async fn recent_comparisons(pool: &SqlitePool, limit: u32) -> Result<Vec<ComparisonSummary>> {
    let rows = sqlx::query(
        r#"
        SELECT reader_a, reader_b, created_at
        FROM comparisons
        ORDER BY created_at DESC, reader_a ASC, reader_b ASC
        LIMIT ?
        "#,
    )
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let created_at: String = row.get("created_at");
            Ok(ComparisonSummary {
                reader_a: row.get("reader_a"),
                reader_b: row.get("reader_b"),
                created_at: parse_timestamp(&created_at)?,
            })
        })
        .collect()
}
