//! Two-reader comparison
//!
//! Everything here is derived from the two shelves plus their single-reader
//! analytics. `compare_with_stats` reuses analytics the caller already has;
//! `compare` computes the ones it needs first.

pub mod alignment;
pub mod matching;
pub mod rift;
pub mod side_by_side;

use serde::{Deserialize, Serialize};
use shelf_common::ReaderShelf;

use crate::analytics::{
    attention_span, genre_radar, hater_hype, rating_distribution, reading_eras, reading_pace,
    AnalyticsResult, AttentionSpan, GenreRadar, HaterHype, RatingDistribution, ReadingEras,
    ReadingPace,
};

pub use self::alignment::{DecadesAlignment, GenreOverlap};
pub use self::matching::{MatchKey, SharedBook, SharedShelf};
pub use self::rift::TheRift;
pub use self::side_by_side::{PaceVsPatience, RatingClash, Winner};

/// All six comparisons for an ordered reader pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub reader_a: String,
    pub reader_b: String,
    pub shared_shelf: SharedShelf,
    pub the_rift: TheRift,
    pub pace_vs_patience: PaceVsPatience,
    pub genre_overlap: GenreOverlap,
    pub decades_alignment: DecadesAlignment,
    pub rating_clash: RatingClash,
}

/// The analytics a comparison reads from one side
struct SideStats<'a> {
    pace: &'a ReadingPace,
    span: &'a AttentionSpan,
    radar: &'a GenreRadar,
    eras: &'a ReadingEras,
    hype: &'a HaterHype,
    ratings: &'a RatingDistribution,
}

impl<'a> From<&'a AnalyticsResult> for SideStats<'a> {
    fn from(stats: &'a AnalyticsResult) -> Self {
        Self {
            pace: &stats.reading_pace,
            span: &stats.attention_span,
            radar: &stats.genre_radar,
            eras: &stats.reading_eras,
            hype: &stats.hater_hype,
            ratings: &stats.rating_distribution,
        }
    }
}

/// Owned analytics for callers that have none yet (no heatmap needed)
struct OwnedSideStats {
    pace: ReadingPace,
    span: AttentionSpan,
    radar: GenreRadar,
    eras: ReadingEras,
    hype: HaterHype,
    ratings: RatingDistribution,
}

impl OwnedSideStats {
    fn compute(shelf: &ReaderShelf) -> Self {
        Self {
            pace: reading_pace::compute(shelf),
            span: attention_span::compute(shelf),
            radar: genre_radar::compute(shelf),
            eras: reading_eras::compute(shelf),
            hype: hater_hype::compute(shelf),
            ratings: rating_distribution::compute(shelf),
        }
    }

    fn borrowed(&self) -> SideStats<'_> {
        SideStats {
            pace: &self.pace,
            span: &self.span,
            radar: &self.radar,
            eras: &self.eras,
            hype: &self.hype,
            ratings: &self.ratings,
        }
    }
}

/// Compare two shelves from scratch
pub fn compare(a: &ReaderShelf, b: &ReaderShelf) -> ComparisonResult {
    let stats_a = OwnedSideStats::compute(a);
    let stats_b = OwnedSideStats::compute(b);
    assemble(a, stats_a.borrowed(), b, stats_b.borrowed())
}

/// Compare two shelves reusing their existing analytics
pub fn compare_with_stats(
    a: &ReaderShelf,
    stats_a: &AnalyticsResult,
    b: &ReaderShelf,
    stats_b: &AnalyticsResult,
) -> ComparisonResult {
    assemble(a, SideStats::from(stats_a), b, SideStats::from(stats_b))
}

fn assemble(
    a: &ReaderShelf,
    sa: SideStats<'_>,
    b: &ReaderShelf,
    sb: SideStats<'_>,
) -> ComparisonResult {
    tracing::debug!(reader_a = %a.reader_id, reader_b = %b.reader_id, "Comparing shelves");

    let shared_shelf = matching::shared_shelf(a, b);
    let the_rift = rift::the_rift(&shared_shelf);

    ComparisonResult {
        reader_a: a.reader_id.clone(),
        reader_b: b.reader_id.clone(),
        pace_vs_patience: side_by_side::pace_vs_patience(sa.pace, sa.span, sb.pace, sb.span),
        genre_overlap: alignment::genre_overlap(sa.radar, sb.radar),
        decades_alignment: alignment::decades_alignment(sa.eras, sb.eras),
        rating_clash: side_by_side::rating_clash(sa.hype, sa.ratings, sb.hype, sb.ratings),
        shared_shelf,
        the_rift,
    }
}
