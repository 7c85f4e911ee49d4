//! Attention span: how long the books are

use serde::{Deserialize, Serialize};
use shelf_common::{ChartData, ReaderShelf};

use super::{mean, median};

/// Upper bound of the short tier (exclusive)
pub const SHORT_MAX: u32 = 250;
/// Upper bound of the medium tier (inclusive)
pub const MEDIUM_MAX: u32 = 400;

/// Fine-grained page buckets for the chart, inclusive bounds
const PAGE_BUCKETS: [(&str, u32, u32); 7] = [
    ("0-100", 0, 100),
    ("101-200", 101, 200),
    ("201-300", 201, 300),
    ("301-400", 301, 400),
    ("401-500", 401, 500),
    ("501-700", 501, 700),
    ("700+", 701, u32::MAX),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpanLabel {
    #[serde(rename = "Sprint Reader")]
    SprintReader,
    #[serde(rename = "Marathon Reader")]
    MarathonReader,
    #[serde(rename = "Ultramarathon Reader")]
    UltramarathonReader,
}

impl SpanLabel {
    pub fn label(&self) -> &'static str {
        match self {
            SpanLabel::SprintReader => "Sprint Reader",
            SpanLabel::MarathonReader => "Marathon Reader",
            SpanLabel::UltramarathonReader => "Ultramarathon Reader",
        }
    }
}

impl std::fmt::Display for SpanLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Books per length tier: short < 250 <= medium <= 400 < long
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub short: usize,
    pub medium: usize,
    pub long: usize,
}

impl TierCounts {
    fn add(&mut self, pages: u32) {
        if pages < SHORT_MAX {
            self.short += 1;
        } else if pages <= MEDIUM_MAX {
            self.medium += 1;
        } else {
            self.long += 1;
        }
    }

    /// Most populous tier; ties favor the shorter tier
    pub fn label(&self) -> SpanLabel {
        if self.short >= self.medium && self.short >= self.long {
            SpanLabel::SprintReader
        } else if self.medium >= self.long {
            SpanLabel::MarathonReader
        } else {
            SpanLabel::UltramarathonReader
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttentionSpan {
    pub avg_pages: f64,
    pub median_pages: f64,
    pub label: SpanLabel,
    pub tier_counts: TierCounts,
    /// Books without a page count
    pub unknown_count: usize,
    pub chart_data: ChartData,
}

pub fn compute(shelf: &ReaderShelf) -> AttentionSpan {
    let pages: Vec<u32> = shelf.books.iter().filter_map(|b| b.page_count).collect();
    let as_f64: Vec<f64> = pages.iter().map(|p| f64::from(*p)).collect();

    let mut tier_counts = TierCounts::default();
    let mut buckets = [0usize; PAGE_BUCKETS.len()];
    for &p in &pages {
        tier_counts.add(p);
        if let Some(i) = PAGE_BUCKETS
            .iter()
            .position(|(_, lo, hi)| (*lo..=*hi).contains(&p))
        {
            buckets[i] += 1;
        }
    }

    let chart_data = ChartData::from_counts(
        PAGE_BUCKETS
            .iter()
            .zip(buckets)
            .map(|((label, _, _), count)| (*label, count)),
    );

    AttentionSpan {
        avg_pages: mean(&as_f64),
        median_pages: median(&as_f64),
        label: tier_counts.label(),
        tier_counts,
        unknown_count: shelf.books.len() - pages.len(),
        chart_data,
    }
}
