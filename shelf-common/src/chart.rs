//! Renderer-agnostic chart series
//!
//! Each analysis hands its numbers over already ordered; these types only
//! guarantee that labels and values stay aligned by index.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Single series: `values[i]` belongs to `labels[i]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Two series sharing one label axis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DualChartData {
    pub labels: Vec<String>,
    pub values_a: Vec<f64>,
    pub values_b: Vec<f64>,
}

impl ChartData {
    /// Build from separate vectors, rejecting mismatched lengths
    pub fn try_new(labels: Vec<String>, values: Vec<f64>) -> Result<Self> {
        if labels.len() != values.len() {
            return Err(Error::InvalidInput(format!(
                "chart has {} labels but {} values",
                labels.len(),
                values.len()
            )));
        }
        Ok(Self { labels, values })
    }

    /// Build from ordered `(label, value)` pairs
    pub fn from_pairs<L, V, I>(pairs: I) -> Self
    where
        L: Into<String>,
        V: Into<f64>,
        I: IntoIterator<Item = (L, V)>,
    {
        let (labels, values) = pairs
            .into_iter()
            .map(|(label, value)| (label.into(), value.into()))
            .unzip();
        Self { labels, values }
    }

    /// Build from ordered `(label, count)` pairs
    pub fn from_counts<L, I>(pairs: I) -> Self
    where
        L: Into<String>,
        I: IntoIterator<Item = (L, usize)>,
    {
        Self::from_pairs(pairs.into_iter().map(|(label, count)| (label, count as f64)))
    }

    pub fn is_aligned(&self) -> bool {
        self.labels.len() == self.values.len()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

impl DualChartData {
    /// Project both sides onto one ordered label axis
    ///
    /// A label missing on one side gets whatever that side's lookup returns,
    /// typically 0.
    pub fn align<FA, FB>(labels: Vec<String>, value_a: FA, value_b: FB) -> Self
    where
        FA: Fn(&str) -> f64,
        FB: Fn(&str) -> f64,
    {
        let values_a = labels.iter().map(|l| value_a(l)).collect();
        let values_b = labels.iter().map(|l| value_b(l)).collect();
        Self {
            labels,
            values_a,
            values_b,
        }
    }

    /// Build from ordered `(label, a, b)` rows
    pub fn from_rows<L, I>(rows: I) -> Self
    where
        L: Into<String>,
        I: IntoIterator<Item = (L, f64, f64)>,
    {
        let mut chart = Self::default();
        for (label, a, b) in rows {
            chart.labels.push(label.into());
            chart.values_a.push(a);
            chart.values_b.push(b);
        }
        chart
    }

    pub fn is_aligned(&self) -> bool {
        self.labels.len() == self.values_a.len() && self.labels.len() == self.values_b.len()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
