//! Dual-series alignment of per-reader distributions

use serde::{Deserialize, Serialize};
use shelf_common::DualChartData;

use crate::analytics::reading_eras::{decade_label, ReadingEras};
use crate::analytics::GenreRadar;

/// Label for books without a publication year
pub const UNKNOWN_DECADE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreOverlap {
    /// Union of both top-genre lists, combined count descending
    pub chart_data: DualChartData,
    pub shared_genres: Vec<String>,
    pub only_a_genres: Vec<String>,
    pub only_b_genres: Vec<String>,
}

pub fn genre_overlap(a: &GenreRadar, b: &GenreRadar) -> GenreOverlap {
    let mut labels: Vec<String> = Vec::new();
    for genre in a.top_genres().chain(b.top_genres()) {
        if !labels.iter().any(|l| l == genre) {
            labels.push(genre.to_string());
        }
    }

    // Stable: equal combined counts keep first appearance (A's list first)
    labels.sort_by_key(|g| std::cmp::Reverse(a.count_for(g) + b.count_for(g)));

    let mut shared_genres = Vec::new();
    let mut only_a_genres = Vec::new();
    let mut only_b_genres = Vec::new();
    for genre in &labels {
        match (a.count_for(genre) > 0, b.count_for(genre) > 0) {
            (true, true) => shared_genres.push(genre.clone()),
            (true, false) => only_a_genres.push(genre.clone()),
            (false, true) => only_b_genres.push(genre.clone()),
            (false, false) => {}
        }
    }

    GenreOverlap {
        chart_data: DualChartData::align(
            labels,
            |g| a.count_for(g) as f64,
            |g| b.count_for(g) as f64,
        ),
        shared_genres,
        only_a_genres,
        only_b_genres,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecadesAlignment {
    /// Union of decades ascending, then "unknown" when either side has one
    pub chart_data: DualChartData,
    pub dominant_a: Option<String>,
    pub dominant_b: Option<String>,
    /// Present only when both readers have a dominant decade
    pub same_era: Option<bool>,
}

pub fn decades_alignment(a: &ReadingEras, b: &ReadingEras) -> DecadesAlignment {
    let mut decades: Vec<i32> = a
        .decades
        .iter()
        .chain(b.decades.iter())
        .map(|d| d.decade)
        .collect();
    decades.sort_unstable();
    decades.dedup();

    let mut rows: Vec<(String, f64, f64)> = decades
        .into_iter()
        .map(|d| (decade_label(d), a.count_for(d) as f64, b.count_for(d) as f64))
        .collect();
    if a.unknown_count > 0 || b.unknown_count > 0 {
        rows.push((
            UNKNOWN_DECADE.to_string(),
            a.unknown_count as f64,
            b.unknown_count as f64,
        ));
    }

    let same_era = match (&a.dominant_era, &b.dominant_era) {
        (Some(x), Some(y)) => Some(x == y),
        _ => None,
    };

    DecadesAlignment {
        chart_data: DualChartData::from_rows(rows),
        dominant_a: a.dominant_era.clone(),
        dominant_b: b.dominant_era.clone(),
        same_era,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{genre_radar, reading_eras};
    use crate::testing::{book, shelf};

    fn by_genre(id: &str, genres: &[&str]) -> shelf_common::ReaderShelf {
        shelf(
            id,
            genres
                .iter()
                .enumerate()
                .map(|(i, g)| book(&format!("{}{}", id, i)).genre(g).build())
                .collect(),
        )
    }

    #[test]
    fn test_genre_union_zero_fills() {
        let a = genre_radar::compute(&by_genre("a", &["Fantasy", "Fantasy", "Poetry"]));
        let b = genre_radar::compute(&by_genre("b", &["History", "Fantasy"]));

        let result = genre_overlap(&a, &b);

        assert_eq!(result.chart_data.labels, vec!["Fantasy", "Poetry", "History"]);
        assert_eq!(result.chart_data.values_a, vec![2.0, 1.0, 0.0]);
        assert_eq!(result.chart_data.values_b, vec![1.0, 0.0, 1.0]);
        assert_eq!(result.shared_genres, vec!["Fantasy"]);
        assert_eq!(result.only_a_genres, vec!["Poetry"]);
        assert_eq!(result.only_b_genres, vec!["History"]);
    }

    #[test]
    fn test_decades_union_with_unknown_last() {
        let a = reading_eras::compute(&shelf(
            "a",
            vec![
                book("1").year(1999).build(),
                book("2").build(),
            ],
        ));
        let b = reading_eras::compute(&shelf(
            "b",
            vec![
                book("3").year(1955).build(),
                book("4").year(2021).build(),
            ],
        ));

        let result = decades_alignment(&a, &b);

        assert_eq!(result.chart_data.labels, vec!["1950s", "1990s", "2020s", "unknown"]);
        assert_eq!(result.chart_data.values_a, vec![0.0, 1.0, 0.0, 1.0]);
        assert_eq!(result.chart_data.values_b, vec![1.0, 0.0, 1.0, 0.0]);
        assert_eq!(result.dominant_a.as_deref(), Some("1990s"));
        assert_eq!(result.dominant_b.as_deref(), Some("1950s"));
        assert_eq!(result.same_era, Some(false));
    }

    #[test]
    fn test_no_unknown_bucket_when_all_dated() {
        let a = reading_eras::compute(&shelf("a", vec![book("1").year(2001).build()]));
        let b = reading_eras::compute(&shelf("b", vec![]));
        let result = decades_alignment(&a, &b);
        assert_eq!(result.chart_data.labels, vec!["2000s"]);
        assert_eq!(result.same_era, None);
    }
}
