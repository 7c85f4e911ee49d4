//! Scalar side-by-side comparisons built from existing analytics

use serde::{Deserialize, Serialize};
use shelf_common::DualChartData;

use crate::analytics::{
    AttentionSpan, HaterHype, RatingDistribution, RatingStyle, ReadingPace, SpanLabel,
};

/// Which reader has the larger value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    A,
    B,
    Tie,
}

impl Winner {
    pub fn of(a: f64, b: f64) -> Self {
        if a > b {
            Winner::A
        } else if b > a {
            Winner::B
        } else {
            Winner::Tie
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaceSide {
    pub books_per_year: f64,
    pub avg_pages: f64,
    pub attention_label: SpanLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaceVsPatience {
    pub reader_a: PaceSide,
    pub reader_b: PaceSide,
    /// More books per year
    pub volume_winner: Winner,
    /// Longer books on average
    pub length_winner: Winner,
    pub chart_data: DualChartData,
}

pub fn pace_vs_patience(
    pace_a: &ReadingPace,
    span_a: &AttentionSpan,
    pace_b: &ReadingPace,
    span_b: &AttentionSpan,
) -> PaceVsPatience {
    let side = |pace: &ReadingPace, span: &AttentionSpan| PaceSide {
        books_per_year: pace.books_per_year,
        avg_pages: span.avg_pages,
        attention_label: span.label,
    };
    let reader_a = side(pace_a, span_a);
    let reader_b = side(pace_b, span_b);

    let chart_data = DualChartData::from_rows([
        ("books_per_year", reader_a.books_per_year, reader_b.books_per_year),
        ("avg_pages", reader_a.avg_pages, reader_b.avg_pages),
    ]);

    PaceVsPatience {
        volume_winner: Winner::of(reader_a.books_per_year, reader_b.books_per_year),
        length_winner: Winner::of(reader_a.avg_pages, reader_b.avg_pages),
        reader_a,
        reader_b,
        chart_data,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClashSide {
    pub label: RatingStyle,
    pub mean_diff: f64,
    pub average_rating: f64,
    pub pct_5_star: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingClash {
    pub reader_a: ClashSide,
    pub reader_b: ClashSide,
    /// "<A label> vs <B label>"
    pub clash_label: String,
    pub same_style: bool,
    pub chart_data: DualChartData,
}

pub fn rating_clash(
    hype_a: &HaterHype,
    ratings_a: &RatingDistribution,
    hype_b: &HaterHype,
    ratings_b: &RatingDistribution,
) -> RatingClash {
    let side = |hype: &HaterHype, ratings: &RatingDistribution| ClashSide {
        label: hype.label,
        mean_diff: hype.mean_diff,
        average_rating: ratings.average,
        pct_5_star: ratings.pct_5_star,
    };
    let reader_a = side(hype_a, ratings_a);
    let reader_b = side(hype_b, ratings_b);

    let chart_data = DualChartData::from_rows([
        ("mean_diff", reader_a.mean_diff, reader_b.mean_diff),
        ("average_rating", reader_a.average_rating, reader_b.average_rating),
        ("pct_5_star", reader_a.pct_5_star, reader_b.pct_5_star),
    ]);

    RatingClash {
        clash_label: format!("{} vs {}", reader_a.label, reader_b.label),
        same_style: reader_a.label == reader_b.label,
        reader_a,
        reader_b,
        chart_data,
    }
}
