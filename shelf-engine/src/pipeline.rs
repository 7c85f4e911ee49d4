//! End-to-end runs: ingest → analytics → payload
//!
//! A comparison runs both readers' pipelines concurrently and only yields a
//! result when both succeed, so a failed side never leaves half a comparison
//! behind for the caller to store.

use chrono::NaiveDate;
use shelf_common::ReaderShelf;

use crate::analytics::{compute_stats, AnalyticsResult};
use crate::comparison::compare_with_stats;
use crate::error::IngestResult;
use crate::ingest::ShelfFetcher;
use crate::payload::{ComparisonPayload, ProfilePayload};

/// Profiles and comparison from one `run_comparison`
#[derive(Debug, Clone)]
pub struct ComparisonRun {
    pub profile_a: ProfilePayload,
    pub profile_b: ProfilePayload,
    pub comparison: ComparisonPayload,
}

async fn analyze(
    fetcher: &ShelfFetcher,
    reader: &str,
    as_of: NaiveDate,
) -> IngestResult<(ReaderShelf, AnalyticsResult)> {
    let shelf = fetcher.fetch_shelf(reader).await?;
    let stats = compute_stats(&shelf, as_of);
    Ok((shelf, stats))
}

/// Full single-reader run
pub async fn run_profile(
    fetcher: &ShelfFetcher,
    reader: &str,
    as_of: NaiveDate,
) -> IngestResult<ProfilePayload> {
    let (shelf, stats) = analyze(fetcher, reader, as_of).await?;
    tracing::info!(
        reader_id = %shelf.reader_id,
        reader = %shelf.display_name(),
        books = shelf.books.len(),
        "Profile complete"
    );
    Ok(ProfilePayload::new(shelf, stats))
}

/// Both readers concurrently, then the comparison; any failure fails the run
pub async fn run_comparison(
    fetcher: &ShelfFetcher,
    reader_a: &str,
    reader_b: &str,
    as_of: NaiveDate,
) -> IngestResult<ComparisonRun> {
    let ((shelf_a, stats_a), (shelf_b, stats_b)) = tokio::try_join!(
        analyze(fetcher, reader_a, as_of),
        analyze(fetcher, reader_b, as_of),
    )?;

    let result = compare_with_stats(&shelf_a, &stats_a, &shelf_b, &stats_b);
    let comparison = ComparisonPayload::new(&shelf_a, &shelf_b, result);
    tracing::info!(
        reader_a = %comparison.reader_a,
        reader_b = %comparison.reader_b,
        shared = comparison.comparison.shared_shelf.shared_count,
        "Comparison complete"
    );

    Ok(ComparisonRun {
        profile_a: ProfilePayload::new(shelf_a, stats_a),
        profile_b: ProfilePayload::new(shelf_b, stats_b),
        comparison,
    })
}
