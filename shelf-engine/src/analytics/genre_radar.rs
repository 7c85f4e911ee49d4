//! Genre radar: genre mix and how evenly it is spread

use serde::{Deserialize, Serialize};
use shelf_common::{ChartData, ReaderShelf};

use super::ranked_counts;

/// Genres shown on the radar
pub const TOP_GENRES: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreRadar {
    /// Every genre, count descending, ties in first-seen order
    pub genre_counts: Vec<GenreCount>,
    pub top_genre: Option<String>,
    pub distinct_genres: usize,
    /// Normalized Shannon entropy in [0, 1]
    pub diversity_score: f64,
    /// Top genres only
    pub chart_data: ChartData,
}

impl GenreRadar {
    /// Full count for `genre`, 0 when never read
    pub fn count_for(&self, genre: &str) -> usize {
        self.genre_counts
            .iter()
            .find(|g| g.genre == genre)
            .map(|g| g.count)
            .unwrap_or(0)
    }

    /// The genres on the radar, in chart order
    pub fn top_genres(&self) -> impl Iterator<Item = &str> {
        self.genre_counts
            .iter()
            .take(TOP_GENRES)
            .map(|g| g.genre.as_str())
    }
}

/// Entropy of the genre counts divided by `ln(total_books)`
///
/// 0.0 for fewer than two books or a single genre; 1.0 when every book has
/// its own genre.
pub fn diversity_score(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    let distinct = counts.iter().filter(|c| **c > 0).count();
    if total < 2 || distinct < 2 {
        return 0.0;
    }

    let total_f = total as f64;
    let entropy: f64 = counts
        .iter()
        .filter(|c| **c > 0)
        .map(|&c| {
            let p = c as f64 / total_f;
            -p * p.ln()
        })
        .sum();

    (entropy / total_f.ln()).clamp(0.0, 1.0)
}

pub fn compute(shelf: &ReaderShelf) -> GenreRadar {
    let genre_counts: Vec<GenreCount> = ranked_counts(shelf.books.iter().map(|b| b.genre.clone()))
        .into_iter()
        .map(|(genre, count)| GenreCount { genre, count })
        .collect();

    let counts: Vec<usize> = genre_counts.iter().map(|g| g.count).collect();

    let chart_data = ChartData::from_counts(
        genre_counts
            .iter()
            .take(TOP_GENRES)
            .map(|g| (g.genre.clone(), g.count)),
    );

    GenreRadar {
        top_genre: genre_counts.first().map(|g| g.genre.clone()),
        distinct_genres: genre_counts.len(),
        diversity_score: diversity_score(&counts),
        genre_counts,
        chart_data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{book, shelf};

    fn genres(names: &[&str]) -> ReaderShelf {
        shelf(
            "1",
            names
                .iter()
                .enumerate()
                .map(|(i, g)| book(&format!("b{}", i)).genre(g).build())
                .collect(),
        )
    }

    #[test]
    fn test_counts_and_tie_order() {
        let result = compute(&genres(&[
            "Poetry", "Fantasy", "Fantasy", "History", "Poetry", "Humor",
        ]));
        let order: Vec<&str> = result.genre_counts.iter().map(|g| g.genre.as_str()).collect();
        assert_eq!(order, vec!["Poetry", "Fantasy", "History", "Humor"]);
        assert_eq!(result.top_genre.as_deref(), Some("Poetry"));
        assert_eq!(result.count_for("Fantasy"), 2);
        assert_eq!(result.count_for("Romance"), 0);
    }

    #[test]
    fn test_chart_limited_to_top_eight() {
        let names: Vec<String> = (0..10).map(|i| format!("G{}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let result = compute(&genres(&refs));

        assert_eq!(result.chart_data.len(), TOP_GENRES);
        assert_eq!(result.genre_counts.len(), 10);
        assert_eq!(result.top_genres().count(), TOP_GENRES);
    }

    #[test]
    fn test_diversity_extremes() {
        assert_eq!(compute(&genres(&["Fantasy", "Fantasy", "Fantasy"])).diversity_score, 0.0);
        assert_eq!(compute(&genres(&["Fantasy"])).diversity_score, 0.0);
        assert_eq!(compute(&genres(&[])).diversity_score, 0.0);

        let spread = compute(&genres(&["A", "B", "C", "D"])).diversity_score;
        assert!((spread - 1.0).abs() < 1e-12);

        let mixed = compute(&genres(&["A", "A", "A", "B"])).diversity_score;
        assert!(mixed > 0.0 && mixed < spread);
    }
}
