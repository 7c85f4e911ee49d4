//! Reading eras: books per publication decade

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shelf_common::{ChartData, ReaderShelf};

/// Decade start for a year, e.g. 1987 -> 1980
pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

/// Display label for a decade start, e.g. 1980 -> "1980s"
pub fn decade_label(decade: i32) -> String {
    format!("{}s", decade)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecadeCount {
    pub decade: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingEras {
    /// Decades with at least one book, ascending
    pub decades: Vec<DecadeCount>,
    /// Books without a publication year
    pub unknown_count: usize,
    /// Most-read decade; ties go to the earliest
    pub dominant_era: Option<String>,
    /// "1950s - 2020s", or a single label when only one decade is present
    pub era_range: Option<String>,
    pub chart_data: ChartData,
}

impl ReadingEras {
    pub fn count_for(&self, decade: i32) -> usize {
        self.decades
            .iter()
            .find(|d| d.decade == decade)
            .map(|d| d.count)
            .unwrap_or(0)
    }
}

pub fn compute(shelf: &ReaderShelf) -> ReadingEras {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    let mut unknown_count = 0usize;

    for book in &shelf.books {
        match book.publication_year {
            Some(year) => *counts.entry(decade_of(year)).or_insert(0) += 1,
            None => unknown_count += 1,
        }
    }

    let decades: Vec<DecadeCount> = counts
        .into_iter()
        .map(|(decade, count)| DecadeCount { decade, count })
        .collect();

    // Ascending iteration; a later decade must strictly beat the best so far
    let dominant_era = decades
        .iter()
        .fold(None::<&DecadeCount>, |best, d| match best {
            Some(b) if b.count >= d.count => Some(b),
            _ => Some(d),
        })
        .map(|d| decade_label(d.decade));

    let era_range = match (decades.first(), decades.last()) {
        (Some(first), Some(last)) if first.decade == last.decade => {
            Some(decade_label(first.decade))
        }
        (Some(first), Some(last)) => Some(format!(
            "{} - {}",
            decade_label(first.decade),
            decade_label(last.decade)
        )),
        _ => None,
    };

    let chart_data =
        ChartData::from_counts(decades.iter().map(|d| (decade_label(d.decade), d.count)));

    ReadingEras {
        decades,
        unknown_count,
        dominant_era,
        era_range,
        chart_data,
    }
}
