//! Author loyalty: how often the reader comes back to the same author

use serde::{Deserialize, Serialize};
use shelf_common::{ChartData, ReaderShelf};

use super::ranked_counts;

/// Repeat authors listed
pub const TOP_AUTHORS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorCount {
    pub author: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorLoyalty {
    pub total_books: usize,
    pub distinct_authors: usize,
    /// Authors with more than one book
    pub repeat_author_count: usize,
    /// `repeat_author_count / distinct_authors`, 0.0 when no authors
    pub loyalty_score: f64,
    /// Share of all books written by a repeat author
    pub repeat_book_share: f64,
    /// Repeat authors, count descending, ties in first-seen order
    pub top_authors: Vec<AuthorCount>,
    pub chart_data: ChartData,
}

pub fn compute(shelf: &ReaderShelf) -> AuthorLoyalty {
    let total_books = shelf.books.len();
    let ranked = ranked_counts(
        shelf
            .books
            .iter()
            .map(|b| b.author.trim())
            .filter(|a| !a.is_empty())
            .map(str::to_string),
    );

    let distinct_authors = ranked.len();
    let repeats: Vec<AuthorCount> = ranked
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(author, count)| AuthorCount { author, count })
        .collect();

    let repeat_books: usize = repeats.iter().map(|a| a.count).sum();
    let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };

    let top_authors: Vec<AuthorCount> = repeats.iter().take(TOP_AUTHORS).cloned().collect();
    let chart_data =
        ChartData::from_counts(top_authors.iter().map(|a| (a.author.clone(), a.count)));

    AuthorLoyalty {
        total_books,
        distinct_authors,
        repeat_author_count: repeats.len(),
        loyalty_score: ratio(repeats.len(), distinct_authors),
        repeat_book_share: ratio(repeat_books, total_books),
        top_authors,
        chart_data,
    }
}
