//! Profile and comparison runs over fake sources

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use shelf_common::config::{EnrichmentSettings, FeedSettings};
use shelf_engine::error::TransportError;
use shelf_engine::ingest::{EnrichmentRecord, EnrichmentSource, FeedSource};
use shelf_engine::pipeline::{run_comparison, run_profile};
use shelf_engine::{IngestError, ShelfFetcher};

/// Reader 1 and 2 have public shelves sharing one book; reader 3 is private
struct TwoReaders;

#[async_trait]
impl FeedSource for TwoReaders {
    async fn fetch_page(
        &self,
        reader_id: &str,
        page: u32,
        _page_size: usize,
    ) -> Result<String, TransportError> {
        if page > 1 {
            return Ok(page_of(reader_id, &[]));
        }
        match reader_id {
            "1" => Ok(page_of(
                "Ann",
                &[
                    ("10", "Piranesi", "Susanna Clarke", 5, "2024-03-02"),
                    ("11", "Kindred", "Octavia E. Butler", 4, "2023-11-20"),
                ],
            )),
            "2" => Ok(page_of(
                "Ben",
                &[
                    ("10", "Piranesi", "Susanna Clarke", 2, "2024-01-10"),
                    ("12", "Beloved", "Toni Morrison", 5, "2022-07-04"),
                ],
            )),
            _ => Err(TransportError::Status(404)),
        }
    }
}

struct NoLookups;

#[async_trait]
impl EnrichmentSource for NoLookups {
    async fn lookup(
        &self,
        _title: &str,
        _author: &str,
    ) -> Result<Option<EnrichmentRecord>, TransportError> {
        Ok(None)
    }
}

fn page_of(name: &str, books: &[(&str, &str, &str, u8, &str)]) -> String {
    let items: String = books
        .iter()
        .map(|(id, title, author, rating, read)| {
            format!(
                "<item><book_id>{id}</book_id><title>{title}</title>\
                 <author_name>{author}</author_name><user_rating>{rating}</user_rating>\
                 <user_read_at>{read}</user_read_at></item>"
            )
        })
        .collect();
    format!(
        "<rss version=\"2.0\"><channel><title>{}'s bookshelf: read</title>{}</channel></rss>",
        name, items
    )
}

fn fetcher() -> ShelfFetcher {
    let feed = FeedSettings {
        page_delay_ms: 0,
        max_retries: 0,
        ..FeedSettings::default()
    };
    let enrichment = EnrichmentSettings {
        delay_ms: 0,
        max_retries: 0,
        ..EnrichmentSettings::default()
    };
    ShelfFetcher::new(Arc::new(TwoReaders), Arc::new(NoLookups), feed, &enrichment)
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

#[tokio::test]
async fn test_run_profile_builds_payload() {
    let payload = run_profile(&fetcher(), "1", as_of()).await.unwrap();

    assert_eq!(payload.reader_id, "1");
    assert_eq!(payload.reader_name.as_deref(), Some("Ann"));
    assert_eq!(payload.book_count, 2);
    assert_eq!(payload.enrichment_coverage, 0.0);
    assert_eq!(payload.stats.rating_distribution.total_rated, 2);
    assert_eq!(payload.stats.reading_heatmap.as_of, as_of());
    assert!(payload.ai.is_none());
}

#[tokio::test]
async fn test_run_comparison_pairs_both_profiles() {
    let run = run_comparison(&fetcher(), "1", "2", as_of()).await.unwrap();

    assert_eq!(run.profile_a.reader_id, "1");
    assert_eq!(run.profile_b.reader_id, "2");
    assert_eq!(run.comparison.reader_a, "1");
    assert_eq!(run.comparison.reader_b_name.as_deref(), Some("Ben"));

    let shared = &run.comparison.comparison.shared_shelf;
    assert_eq!(shared.shared_count, 1);
    assert_eq!(shared.only_a_count, 1);
    assert_eq!(shared.only_b_count, 1);
    assert_eq!(run.comparison.comparison.the_rift.biggest_rifts.len(), 1);
}

#[tokio::test]
async fn test_run_comparison_fails_when_either_side_fails() {
    let err = run_comparison(&fetcher(), "1", "3", as_of()).await.unwrap_err();
    assert!(matches!(err, IngestError::ProfilePrivateOrInvalid(id) if id == "3"));

    let err = run_comparison(&fetcher(), "3", "2", as_of()).await.unwrap_err();
    assert!(matches!(err, IngestError::ProfilePrivateOrInvalid(id) if id == "3"));
}
