//! Book and shelf data model
//!
//! Every value here is produced by normalization and never mutated afterwards.
//! Analyses read these records as-is; defaults (such as the genre fallback)
//! are applied before a `Book` exists.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Genre used when the lookup source could not classify a book
pub const DEFAULT_GENRE: &str = "Other";

/// One completed book on a reader's shelf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Feed identifier, unique within one shelf
    pub source_id: String,
    pub title: String,
    pub author: String,
    /// Reader's own rating, 1..=5 when present
    pub user_rating: Option<u8>,
    /// Crowd average rating from the feed
    pub average_rating: Option<f64>,
    pub date_read: Option<NaiveDate>,
    pub publication_year: Option<i32>,
    pub page_count: Option<u32>,
    /// Never empty; `DEFAULT_GENRE` when unknown
    pub genre: String,
    pub review_text: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
}

/// Outcome of the enrichment pass attached to a shelf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnrichmentStatus {
    /// Every book was enriched
    Complete,
    /// Some lookups failed; the shelf is still valid
    PartialEnrichmentDegraded {
        enriched: usize,
        total: usize,
        coverage: f64,
    },
}

/// A reader's complete "read" shelf from one ingestion run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderShelf {
    pub reader_id: String,
    /// Display name taken from the feed, when available
    #[serde(default)]
    pub reader_name: Option<String>,
    pub books: Vec<Book>,
    pub fetched_at: DateTime<Utc>,
    /// Fraction of books successfully enriched (0.0-1.0)
    pub enrichment_coverage: f64,
}

impl ReaderShelf {
    pub fn new(
        reader_id: impl Into<String>,
        reader_name: Option<String>,
        books: Vec<Book>,
        fetched_at: DateTime<Utc>,
        enriched: usize,
    ) -> Self {
        let enrichment_coverage = coverage(enriched, books.len());
        Self {
            reader_id: reader_id.into(),
            reader_name,
            books,
            fetched_at,
            enrichment_coverage,
        }
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    /// Number of books the coverage fraction corresponds to
    pub fn enriched_count(&self) -> usize {
        (self.enrichment_coverage * self.books.len() as f64).round() as usize
    }

    /// Non-fatal enrichment status carried alongside the shelf
    pub fn enrichment_status(&self) -> EnrichmentStatus {
        if self.enrichment_coverage >= 1.0 {
            EnrichmentStatus::Complete
        } else {
            EnrichmentStatus::PartialEnrichmentDegraded {
                enriched: self.enriched_count(),
                total: self.books.len(),
                coverage: self.enrichment_coverage,
            }
        }
    }

    /// Name for display, falling back to the reader id
    pub fn display_name(&self) -> &str {
        self.reader_name.as_deref().unwrap_or(&self.reader_id)
    }
}

/// `successes / total`, defined as 1.0 for an empty shelf
pub fn coverage(successes: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        successes.min(total) as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: &str) -> Book {
        Book {
            source_id: id.to_string(),
            title: format!("Title {}", id),
            author: "Author".to_string(),
            user_rating: None,
            average_rating: None,
            date_read: None,
            publication_year: None,
            page_count: None,
            genre: DEFAULT_GENRE.to_string(),
            review_text: None,
            isbn: None,
            cover_url: None,
        }
    }

    #[test]
    fn test_coverage_complete() {
        let shelf = ReaderShelf::new("1", None, vec![book("a"), book("b")], Utc::now(), 2);
        assert_eq!(shelf.enrichment_coverage, 1.0);
        assert_eq!(shelf.enrichment_status(), EnrichmentStatus::Complete);
    }

    #[test]
    fn test_coverage_degraded() {
        let books = vec![book("a"), book("b"), book("c"), book("d")];
        let shelf = ReaderShelf::new("1", None, books, Utc::now(), 3);
        assert_eq!(shelf.enrichment_coverage, 0.75);
        assert_eq!(
            shelf.enrichment_status(),
            EnrichmentStatus::PartialEnrichmentDegraded {
                enriched: 3,
                total: 4,
                coverage: 0.75
            }
        );
    }

    #[test]
    fn test_coverage_empty_shelf_is_complete() {
        assert_eq!(coverage(0, 0), 1.0);
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let shelf = ReaderShelf::new("42", None, vec![], Utc::now(), 0);
        assert_eq!(shelf.display_name(), "42");
    }

    #[test]
    fn test_status_serializes_with_tag() {
        let json = serde_json::to_value(EnrichmentStatus::Complete).unwrap();
        assert_eq!(json["status"], "complete");
    }
}
