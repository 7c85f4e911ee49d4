//! Raw entry normalization
//!
//! The only place feed text is interpreted. Every malformed or out-of-range
//! field becomes absent; nothing here fails.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use shelf_common::{Book, DEFAULT_GENRE};

use crate::ingest::{genre_mapper, RawEntry};

/// Date-only formats, tried after the timestamp formats
const DATE_FORMATS: [&str; 10] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Normalize entries in ingestion order, keeping the first of each source id
pub fn normalize(entries: Vec<RawEntry>) -> Vec<Book> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut books = Vec::with_capacity(entries.len());

    for entry in entries {
        let book = normalize_entry(entry);
        if seen.insert(book.source_id.clone()) {
            books.push(book);
        } else {
            tracing::debug!(source_id = %book.source_id, "Dropping duplicate entry");
        }
    }

    books
}

/// Convert one raw entry into a validated `Book`
pub fn normalize_entry(entry: RawEntry) -> Book {
    let title = entry.title.trim().to_string();
    let author = entry.author.trim().to_string();
    let source_id = match entry.source_id.trim() {
        "" => synthetic_id(&title, &author),
        id => id.to_string(),
    };

    let page_count = entry
        .enriched_page_count
        .filter(|p| *p > 0)
        .or_else(|| parse_page_count(&entry.num_pages));

    let genre = entry
        .enriched_genre
        .map(|g| g.trim().to_string())
        .filter(|g| genre_mapper::is_known_genre(g))
        .unwrap_or_else(|| DEFAULT_GENRE.to_string());

    Book {
        source_id,
        title,
        author,
        user_rating: parse_user_rating(&entry.user_rating),
        average_rating: parse_average_rating(&entry.average_rating),
        date_read: parse_date(&entry.date_read),
        publication_year: parse_year(&entry.publication_year),
        page_count,
        genre,
        review_text: non_empty(&entry.review),
        isbn: non_empty(&entry.isbn),
        cover_url: non_empty(&entry.cover_url),
    }
}

/// Stand-in id for entries the feed left unidentified
pub fn synthetic_id(title: &str, author: &str) -> String {
    format!("{}|{}", title.trim(), author.trim())
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parse a feed date in any of the accepted formats, keeping the calendar date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
    {
        return Some(date);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
}

/// Reader rating: whole number 1..=5, anything else (including 0) is unrated
pub fn parse_user_rating(value: &str) -> Option<u8> {
    let value = value.trim();
    let rating = match value.parse::<u8>() {
        Ok(r) => r,
        Err(_) => {
            let f = value.parse::<f64>().ok().filter(|f| f.is_finite())?;
            if f.fract() != 0.0 || !(0.0..=5.0).contains(&f) {
                return None;
            }
            f as u8
        }
    };
    (1..=5).contains(&rating).then_some(rating)
}

/// Crowd average in (0, 5]
pub fn parse_average_rating(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite() && *r > 0.0 && *r <= 5.0)
}

pub fn parse_year(value: &str) -> Option<i32> {
    value.trim().parse::<i32>().ok().filter(|y| *y > 0)
}

pub fn parse_page_count(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|p| *p > 0)
}
