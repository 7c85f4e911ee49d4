//! Reading heatmap: daily completions over the trailing year

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use shelf_common::{ChartData, ReaderShelf};

/// Days before `as_of` covered by the window
pub const WINDOW_DAYS: u64 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapDay {
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingHeatmap {
    pub as_of: NaiveDate,
    pub window_start: NaiveDate,
    /// Every date in `[window_start, as_of]`, zeros included
    pub days: Vec<HeatmapDay>,
    pub total_in_window: usize,
    /// Days with at least one completion
    pub total_days_reading: usize,
    /// Earliest date with the highest count
    pub max_day: Option<NaiveDate>,
    /// Longest run of consecutive reading days
    pub streak_max: usize,
    pub chart_data: ChartData,
}

/// Heatmap for the window ending at `as_of` (inclusive at both ends)
pub fn compute(shelf: &ReaderShelf, as_of: NaiveDate) -> ReadingHeatmap {
    let window_start = as_of
        .checked_sub_days(Days::new(WINDOW_DAYS))
        .unwrap_or(NaiveDate::MIN);

    let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();
    for date in shelf.books.iter().filter_map(|b| b.date_read) {
        if date >= window_start && date <= as_of {
            *per_day.entry(date).or_insert(0) += 1;
        }
    }

    let days: Vec<HeatmapDay> = window_start
        .iter_days()
        .take_while(|d| *d <= as_of)
        .map(|date| HeatmapDay {
            date,
            count: per_day.get(&date).copied().unwrap_or(0),
        })
        .collect();

    let mut max_day: Option<HeatmapDay> = None;
    let mut streak = 0usize;
    let mut streak_max = 0usize;
    for day in &days {
        if day.count > 0 {
            streak += 1;
            streak_max = streak_max.max(streak);
            if max_day.map_or(true, |best| day.count > best.count) {
                max_day = Some(*day);
            }
        } else {
            streak = 0;
        }
    }

    ReadingHeatmap {
        as_of,
        window_start,
        total_in_window: per_day.values().sum(),
        total_days_reading: per_day.len(),
        max_day: max_day.map(|d| d.date),
        streak_max,
        chart_data: ChartData::from_counts(days.iter().map(|d| (d.date.to_string(), d.count))),
        days,
    }
}
