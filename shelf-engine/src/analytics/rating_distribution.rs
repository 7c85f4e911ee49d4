//! Rating distribution: histogram of the reader's own star ratings

use serde::{Deserialize, Serialize};
use shelf_common::{ChartData, ReaderShelf};

use super::{mean, median};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingDistribution {
    /// Mean of present ratings, 0.0 when none
    pub average: f64,
    pub median: f64,
    pub total_rated: usize,
    pub unrated_count: usize,
    /// Percentage (0-100) of present ratings equal to 5
    pub pct_5_star: f64,
    /// Labels "1" through "5"
    pub chart_data: ChartData,
}

pub fn compute(shelf: &ReaderShelf) -> RatingDistribution {
    let ratings: Vec<u8> = shelf.books.iter().filter_map(|b| b.user_rating).collect();
    let as_f64: Vec<f64> = ratings.iter().map(|r| f64::from(*r)).collect();

    let mut histogram = [0usize; 5];
    for &r in &ratings {
        if (1..=5).contains(&r) {
            histogram[usize::from(r - 1)] += 1;
        }
    }

    let pct_5_star = if ratings.is_empty() {
        0.0
    } else {
        histogram[4] as f64 * 100.0 / ratings.len() as f64
    };

    RatingDistribution {
        average: mean(&as_f64),
        median: median(&as_f64),
        total_rated: ratings.len(),
        unrated_count: shelf.books.len() - ratings.len(),
        pct_5_star,
        chart_data: ChartData::from_counts(
            histogram
                .iter()
                .enumerate()
                .map(|(i, count)| ((i + 1).to_string(), *count)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{book, shelf};

    #[test]
    fn test_histogram_and_summary() {
        let result = compute(&shelf(
            "1",
            vec![
                book("a").rated(5).build(),
                book("b").rated(5).build(),
                book("c").rated(3).build(),
                book("d").rated(1).build(),
                book("e").build(),
            ],
        ));

        assert_eq!(result.chart_data.labels, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(result.chart_data.values, vec![1.0, 0.0, 1.0, 0.0, 2.0]);
        assert_eq!(result.average, 3.5);
        assert_eq!(result.median, 4.0);
        assert_eq!(result.total_rated, 4);
        assert_eq!(result.unrated_count, 1);
        assert_eq!(result.pct_5_star, 50.0);
    }

    #[test]
    fn test_no_ratings() {
        let result = compute(&shelf("1", vec![book("a").build()]));
        assert_eq!(result.average, 0.0);
        assert_eq!(result.pct_5_star, 0.0);
        assert_eq!(result.chart_data.len(), 5);
        assert_eq!(result.chart_data.total(), 0.0);
    }
}
