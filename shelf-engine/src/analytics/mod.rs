//! Single-reader analytics
//!
//! Every analysis is a pure function of the shelf (the heatmap also takes an
//! explicit reference date). Outputs are unrounded; presentation rounding is
//! the caller's concern.

pub mod attention_span;
pub mod author_loyalty;
pub mod genre_radar;
pub mod hater_hype;
pub mod rating_distribution;
pub mod reading_eras;
pub mod reading_heatmap;
pub mod reading_pace;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shelf_common::ReaderShelf;

pub use self::attention_span::{AttentionSpan, SpanLabel};
pub use self::author_loyalty::AuthorLoyalty;
pub use self::genre_radar::GenreRadar;
pub use self::hater_hype::{HaterHype, RatingStyle};
pub use self::rating_distribution::RatingDistribution;
pub use self::reading_eras::ReadingEras;
pub use self::reading_heatmap::ReadingHeatmap;
pub use self::reading_pace::ReadingPace;

/// All eight analyses for one shelf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResult {
    pub hater_hype: HaterHype,
    pub reading_eras: ReadingEras,
    pub attention_span: AttentionSpan,
    pub genre_radar: GenreRadar,
    pub reading_pace: ReadingPace,
    pub author_loyalty: AuthorLoyalty,
    pub rating_distribution: RatingDistribution,
    pub reading_heatmap: ReadingHeatmap,
}

/// Run every analysis over `shelf`, using `as_of` as the heatmap's "today"
pub fn compute_stats(shelf: &ReaderShelf, as_of: NaiveDate) -> AnalyticsResult {
    tracing::debug!(
        reader_id = %shelf.reader_id,
        books = shelf.books.len(),
        as_of = %as_of,
        "Computing analytics"
    );

    AnalyticsResult {
        hater_hype: hater_hype::compute(shelf),
        reading_eras: reading_eras::compute(shelf),
        attention_span: attention_span::compute(shelf),
        genre_radar: genre_radar::compute(shelf),
        reading_pace: reading_pace::compute(shelf),
        author_loyalty: author_loyalty::compute(shelf),
        rating_distribution: rating_distribution::compute(shelf),
        reading_heatmap: reading_heatmap::compute(shelf, as_of),
    }
}

/// Arithmetic mean, 0.0 for no values
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Median, 0.0 for no values
pub(crate) fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Count occurrences of each key, ordered by count descending, ties by first appearance
pub(crate) fn ranked_counts<I>(keys: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    for key in keys {
        match index.get(&key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }
    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
