//! Shared fixtures for store and API tests

#![allow(dead_code)]

use anyhow::Result;
use chrono::{NaiveDate, TimeZone, Utc};
use shelf_common::{Book, ReaderShelf};
use shelf_engine::db;
use shelf_engine::payload::{ComparisonPayload, ProfilePayload};
use shelf_engine::{compare, compute_stats};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Fresh database file with tables created
///
/// Returns (TempDir, SqlitePool) - TempDir must be kept alive for duration of test
pub async fn create_test_db() -> Result<(TempDir, SqlitePool)> {
    let temp_dir = TempDir::new()?;
    let pool = db::init_database_pool(&temp_dir.path().join("shelf.db")).await?;
    Ok((temp_dir, pool))
}

pub fn shelf(reader_id: &str, name: &str, rated_titles: &[(&str, u8)]) -> ReaderShelf {
    let books = rated_titles
        .iter()
        .enumerate()
        .map(|(i, (title, rating))| Book {
            source_id: format!("{}-{}", reader_id, i),
            title: title.to_string(),
            author: "Test Author".to_string(),
            user_rating: Some(*rating),
            average_rating: Some(3.9),
            date_read: NaiveDate::from_ymd_opt(2024, 1 + i as u32 % 12, 1),
            publication_year: Some(2000 + i as i32),
            page_count: Some(300),
            genre: "Fantasy".to_string(),
            review_text: None,
            isbn: None,
            cover_url: None,
        })
        .collect::<Vec<_>>();
    let count = books.len();
    let fetched_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    ReaderShelf::new(reader_id, Some(name.to_string()), books, fetched_at, count)
}

pub fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

pub fn profile(reader_id: &str, name: &str, rated_titles: &[(&str, u8)]) -> ProfilePayload {
    let shelf = shelf(reader_id, name, rated_titles);
    let stats = compute_stats(&shelf, as_of());
    ProfilePayload::new(shelf, stats)
}

pub fn comparison(a: &ProfilePayload, b: &ProfilePayload) -> ComparisonPayload {
    let shelf_a = a.to_shelf();
    let shelf_b = b.to_shelf();
    let result = compare(&shelf_a, &shelf_b);
    ComparisonPayload::new(&shelf_a, &shelf_b, result)
}
