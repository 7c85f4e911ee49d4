//! Reading pace: completions per calendar month

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use shelf_common::{ChartData, ReaderShelf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingPace {
    /// Dated books / distinct years with at least one dated book
    pub books_per_year: f64,
    /// Dated books / distinct months with at least one dated book
    pub books_per_month: f64,
    /// Every month tied for the highest count, ascending
    pub peak_months: Vec<String>,
    /// Earliest of `peak_months`
    pub peak_month: Option<String>,
    /// Year with the most completions; ties go to the earliest
    pub peak_year: Option<i32>,
    pub total_years: usize,
    pub undated_count: usize,
    /// "YYYY-MM" labels ascending, months with no reads omitted
    pub chart_data: ChartData,
}

pub fn compute(shelf: &ReaderShelf) -> ReadingPace {
    let mut months: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    let mut years: BTreeMap<i32, usize> = BTreeMap::new();
    let mut undated_count = 0usize;

    for book in &shelf.books {
        match book.date_read {
            Some(date) => {
                *months.entry((date.year(), date.month())).or_insert(0) += 1;
                *years.entry(date.year()).or_insert(0) += 1;
            }
            None => undated_count += 1,
        }
    }

    let dated = shelf.books.len() - undated_count;
    let per = |buckets: usize| {
        if buckets == 0 {
            0.0
        } else {
            dated as f64 / buckets as f64
        }
    };

    let month_label = |(y, m): (i32, u32)| format!("{:04}-{:02}", y, m);

    let peak_count = months.values().copied().max().unwrap_or(0);
    let peak_months: Vec<String> = months
        .iter()
        .filter(|(_, count)| **count == peak_count && peak_count > 0)
        .map(|(key, _)| month_label(*key))
        .collect();

    let peak_year = years
        .iter()
        .fold(None::<(i32, usize)>, |best, (&year, &count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((year, count)),
        })
        .map(|(year, _)| year);

    ReadingPace {
        books_per_year: per(years.len()),
        books_per_month: per(months.len()),
        peak_month: peak_months.first().cloned(),
        peak_months,
        peak_year,
        total_years: years.len(),
        undated_count,
        chart_data: ChartData::from_counts(months.iter().map(|(k, v)| (month_label(*k), *v))),
    }
}
