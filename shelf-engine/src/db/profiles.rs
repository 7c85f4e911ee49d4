//! Profile rows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shelf_common::Result;
use sqlx::{Row, SqliteConnection, SqlitePool};

use super::{parse_timestamp, timestamp};
use crate::payload::ProfilePayload;

/// A stored profile with its row metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProfile {
    pub reader_id: String,
    pub reader_name: Option<String>,
    pub book_count: usize,
    pub updated_at: DateTime<Utc>,
    pub payload: ProfilePayload,
}

/// Row metadata only, for listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub reader_id: String,
    pub reader_name: Option<String>,
    pub book_count: usize,
    pub updated_at: DateTime<Utc>,
}

/// Insert or fully replace a reader's profile
pub async fn upsert_profile(pool: &SqlitePool, payload: &ProfilePayload) -> Result<()> {
    let mut tx = pool.begin().await?;
    write_profile(&mut *tx, payload, Utc::now()).await?;
    tx.commit().await?;

    tracing::info!(reader_id = %payload.reader_id, "Profile stored");
    Ok(())
}

/// Row write shared with multi-row transactions
pub(crate) async fn write_profile(
    conn: &mut SqliteConnection,
    payload: &ProfilePayload,
    at: DateTime<Utc>,
) -> Result<()> {
    payload.validate()?;
    let payload_json = serde_json::to_string(payload)?;

    sqlx::query(
        r#"
        INSERT INTO profiles (reader_id, reader_name, book_count, payload_json, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(reader_id) DO UPDATE SET
            reader_name = excluded.reader_name,
            book_count = excluded.book_count,
            payload_json = excluded.payload_json,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&payload.reader_id)
    .bind(&payload.reader_name)
    .bind(payload.book_count as i64)
    .bind(&payload_json)
    .bind(timestamp(at))
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn get_profile(pool: &SqlitePool, reader_id: &str) -> Result<Option<StoredProfile>> {
    let row = sqlx::query(
        r#"
        SELECT reader_id, reader_name, book_count, payload_json, updated_at
        FROM profiles
        WHERE reader_id = ?
        "#,
    )
    .bind(reader_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let payload_json: String = row.get("payload_json");
            let updated_at: String = row.get("updated_at");
            let book_count: i64 = row.get("book_count");

            Ok(Some(StoredProfile {
                reader_id: row.get("reader_id"),
                reader_name: row.get("reader_name"),
                book_count: book_count.max(0) as usize,
                updated_at: parse_timestamp(&updated_at)?,
                payload: serde_json::from_str(&payload_json)?,
            }))
        }
        None => Ok(None),
    }
}

/// Most recently updated profiles first
pub async fn recent_profiles(pool: &SqlitePool, limit: u32) -> Result<Vec<ProfileSummary>> {
    let rows = sqlx::query(
        r#"
        SELECT reader_id, reader_name, book_count, updated_at
        FROM profiles
        ORDER BY updated_at DESC, reader_id ASC
        LIMIT ?
        "#,
    )
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let updated_at: String = row.get("updated_at");
            let book_count: i64 = row.get("book_count");
            Ok(ProfileSummary {
                reader_id: row.get("reader_id"),
                reader_name: row.get("reader_name"),
                book_count: book_count.max(0) as usize,
                updated_at: parse_timestamp(&updated_at)?,
            })
        })
        .collect()
}
