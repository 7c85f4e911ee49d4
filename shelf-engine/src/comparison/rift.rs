//! The Rift: shared books the two readers rated furthest apart

use serde::{Deserialize, Serialize};
use shelf_common::ChartData;

use super::matching::SharedShelf;

/// Rifts reported
pub const RIFT_TOP_K: usize = 5;
/// Agreement examples reported
const AGREEMENT_EXAMPLES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiftEntry {
    pub title: String,
    pub author: String,
    pub rating_a: u8,
    pub rating_b: u8,
    pub difference: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agreement {
    pub title: String,
    pub author: String,
    pub rating: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TheRift {
    /// Up to five pairs, difference descending, ties in shared-shelf order
    pub biggest_rifts: Vec<RiftEntry>,
    /// Shared books rated by both
    pub total_rated_pairs: usize,
    /// Pairs with a non-zero difference
    pub total_disagreements: usize,
    pub perfect_agreements: usize,
    pub agreement_examples: Vec<Agreement>,
    /// Difference per rift title
    pub chart_data: ChartData,
}

pub fn the_rift(shared: &SharedShelf) -> TheRift {
    let mut pairs: Vec<RiftEntry> = shared
        .shared_books
        .iter()
        .filter_map(|b| match (b.rating_a, b.rating_b) {
            (Some(ra), Some(rb)) => Some(RiftEntry {
                title: b.title.clone(),
                author: b.author.clone(),
                rating_a: ra,
                rating_b: rb,
                difference: ra.abs_diff(rb),
            }),
            _ => None,
        })
        .collect();

    let total_rated_pairs = pairs.len();
    let total_disagreements = pairs.iter().filter(|p| p.difference > 0).count();
    let agreements: Vec<Agreement> = pairs
        .iter()
        .filter(|p| p.difference == 0)
        .map(|p| Agreement {
            title: p.title.clone(),
            author: p.author.clone(),
            rating: p.rating_a,
        })
        .collect();

    // Stable: equal differences keep shared-shelf order
    pairs.sort_by(|x, y| y.difference.cmp(&x.difference));
    pairs.truncate(RIFT_TOP_K);

    let chart_data = ChartData::from_pairs(
        pairs
            .iter()
            .map(|p| (p.title.clone(), f64::from(p.difference))),
    );

    TheRift {
        biggest_rifts: pairs,
        total_rated_pairs,
        total_disagreements,
        perfect_agreements: agreements.len(),
        agreement_examples: agreements.into_iter().take(AGREEMENT_EXAMPLES).collect(),
        chart_data,
    }
}
