//! Hater/Hype index: how the reader rates relative to the crowd

use serde::{Deserialize, Serialize};
use shelf_common::{ChartData, ReaderShelf};

use super::mean;

/// Mean difference at or beyond which a reader is labeled a critic or a hype beast
pub const STYLE_THRESHOLD: f64 = 0.3;
/// Absorbs float noise at the exact threshold
const THRESHOLD_TOLERANCE: f64 = 1e-9;

/// Reader's rating personality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatingStyle {
    #[serde(rename = "Contrarian Critic")]
    ContrarianCritic,
    #[serde(rename = "Fair Judge")]
    FairJudge,
    #[serde(rename = "Hype Beast")]
    HypeBeast,
}

impl RatingStyle {
    pub fn from_mean_diff(mean_diff: f64) -> Self {
        if mean_diff <= -STYLE_THRESHOLD + THRESHOLD_TOLERANCE {
            RatingStyle::ContrarianCritic
        } else if mean_diff >= STYLE_THRESHOLD - THRESHOLD_TOLERANCE {
            RatingStyle::HypeBeast
        } else {
            RatingStyle::FairJudge
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RatingStyle::ContrarianCritic => "Contrarian Critic",
            RatingStyle::FairJudge => "Fair Judge",
            RatingStyle::HypeBeast => "Hype Beast",
        }
    }
}

impl std::fmt::Display for RatingStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One book's rating pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingPoint {
    pub title: String,
    pub user_rating: Option<u8>,
    pub average_rating: Option<f64>,
    /// `user - average`, present only when both ratings are
    pub diff: Option<f64>,
    /// Whether the point contributes to the mean
    pub included: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HaterHype {
    pub mean_diff: f64,
    pub label: RatingStyle,
    pub total_rated: usize,
    /// Books lacking either rating
    pub excluded_count: usize,
    pub points: Vec<RatingPoint>,
    /// Histogram of diffs rounded to whole stars, "-4" through "+4"
    pub chart_data: ChartData,
}

fn bucket_label(bucket: i32) -> String {
    if bucket > 0 {
        format!("+{}", bucket)
    } else {
        bucket.to_string()
    }
}

pub fn compute(shelf: &ReaderShelf) -> HaterHype {
    let points: Vec<RatingPoint> = shelf
        .books
        .iter()
        .map(|book| {
            let diff = match (book.user_rating, book.average_rating) {
                (Some(user), Some(avg)) => Some(f64::from(user) - avg),
                _ => None,
            };
            RatingPoint {
                title: book.title.clone(),
                user_rating: book.user_rating,
                average_rating: book.average_rating,
                diff,
                included: diff.is_some(),
            }
        })
        .collect();

    let diffs: Vec<f64> = points.iter().filter_map(|p| p.diff).collect();
    let mean_diff = mean(&diffs);

    let mut buckets = [0usize; 9];
    for diff in &diffs {
        let bucket = (diff.round() as i32).clamp(-4, 4);
        buckets[(bucket + 4) as usize] += 1;
    }
    let chart_data = ChartData::from_counts(
        (-4..=4).map(|b| (bucket_label(b), buckets[(b + 4) as usize])),
    );

    HaterHype {
        mean_diff,
        label: RatingStyle::from_mean_diff(mean_diff),
        total_rated: diffs.len(),
        excluded_count: points.len() - diffs.len(),
        points,
        chart_data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{book, shelf};

    fn rated(title: &str, user: Option<u8>, avg: Option<f64>) -> shelf_common::Book {
        let mut b = book(title);
        if let Some(u) = user {
            b = b.rated(u);
        }
        if let Some(a) = avg {
            b = b.avg(a);
        }
        b.build()
    }

    #[test]
    fn test_hype_beast() {
        let result = compute(&shelf(
            "1",
            vec![
                rated("a", Some(5), Some(4.0)),
                rated("b", Some(4), Some(3.5)),
            ],
        ));
        assert!((result.mean_diff - 0.75).abs() < 1e-12);
        assert_eq!(result.label, RatingStyle::HypeBeast);
        assert_eq!(result.total_rated, 2);
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        assert_eq!(RatingStyle::from_mean_diff(0.3), RatingStyle::HypeBeast);
        assert_eq!(RatingStyle::from_mean_diff(-0.3), RatingStyle::ContrarianCritic);
        assert_eq!(RatingStyle::from_mean_diff(0.2999), RatingStyle::FairJudge);
        assert_eq!(RatingStyle::from_mean_diff(-0.2999), RatingStyle::FairJudge);

        // 4 - 3.7 is not exactly 0.3 in floating point
        let result = compute(&shelf("1", vec![rated("a", Some(4), Some(3.7))]));
        assert_eq!(result.label, RatingStyle::HypeBeast);
    }

    #[test]
    fn test_missing_ratings_excluded() {
        let result = compute(&shelf(
            "1",
            vec![
                rated("a", Some(2), Some(4.0)),
                rated("b", None, Some(4.0)),
                rated("c", Some(3), None),
            ],
        ));
        assert_eq!(result.total_rated, 1);
        assert_eq!(result.excluded_count, 2);
        assert_eq!(result.mean_diff, -2.0);
        assert_eq!(result.label, RatingStyle::ContrarianCritic);
        assert_eq!(result.points.len(), 3);
        assert!(!result.points[1].included);
    }

    #[test]
    fn test_empty_shelf_is_fair_judge() {
        let result = compute(&shelf("1", vec![]));
        assert_eq!(result.mean_diff, 0.0);
        assert_eq!(result.label, RatingStyle::FairJudge);
        assert_eq!(result.chart_data.len(), 9);
        assert_eq!(result.chart_data.total(), 0.0);
    }

    #[test]
    fn test_histogram_buckets() {
        let result = compute(&shelf(
            "1",
            vec![
                rated("a", Some(5), Some(3.9)),
                rated("b", Some(1), Some(4.8)),
            ],
        ));
        let labels = &result.chart_data.labels;
        assert_eq!(labels.first().map(String::as_str), Some("-4"));
        assert_eq!(labels[4], "0");
        assert_eq!(labels.last().map(String::as_str), Some("+4"));
        // +1.1 -> "+1", -3.8 -> "-4"
        assert_eq!(result.chart_data.values[5], 1.0);
        assert_eq!(result.chart_data.values[0], 1.0);
    }

    #[test]
    fn test_label_serializes_as_display_text() {
        let json = serde_json::to_value(RatingStyle::HypeBeast).unwrap();
        assert_eq!(json, "Hype Beast");
    }
}
