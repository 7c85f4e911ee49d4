//! Cross-shelf book matching
//!
//! Two readers' copies of a book rarely share an id, so books are matched on
//! a folded `(title, author)` key. Subtitles and trailing series markers are
//! dropped from titles: "Leviathan Wakes (The Expanse, #1)" and
//! "Leviathan Wakes" are one book. Author name order and translations are not
//! reconciled.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use shelf_common::{Book, ChartData, ReaderShelf};

/// Folded identity of a book across shelves
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchKey {
    pub title: String,
    pub author: String,
}

impl MatchKey {
    pub fn for_book(book: &Book) -> Self {
        Self {
            title: fold_title(&book.title),
            author: fold_text(&book.author),
        }
    }
}

/// Lowercase, non-alphanumerics to spaces, whitespace collapsed
pub fn fold_text(text: &str) -> String {
    let spaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `fold_text` after dropping any subtitle and trailing parenthetical
///
/// Falls back to the whole title when stripping would leave nothing.
pub fn fold_title(title: &str) -> String {
    let mut core = title.trim();

    // Series markers may contain a colon themselves
    if core.ends_with(')') {
        if let Some(open) = core.rfind('(') {
            let head = core[..open].trim_end();
            if !head.is_empty() {
                core = head;
            }
        }
    }

    if let Some((head, _)) = core.split_once(':') {
        if !head.trim().is_empty() {
            core = head.trim_end();
        }
    }

    fold_text(core)
}

/// A book present on both shelves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedBook {
    /// Title and author as shelf A has them
    pub title: String,
    pub author: String,
    pub rating_a: Option<u8>,
    pub rating_b: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedShelf {
    pub shared_count: usize,
    pub only_a_count: usize,
    pub only_b_count: usize,
    /// In shelf A order
    pub shared_books: Vec<SharedBook>,
    /// Venn counts: "only_a", "shared", "only_b"
    pub chart_data: ChartData,
}

/// First book per key, in shelf order
fn first_by_key(shelf: &ReaderShelf) -> Vec<(MatchKey, &Book)> {
    let mut seen: HashSet<MatchKey> = HashSet::new();
    shelf
        .books
        .iter()
        .filter_map(|book| {
            let key = MatchKey::for_book(book);
            seen.insert(key.clone()).then_some((key, book))
        })
        .collect()
}

pub fn shared_shelf(a: &ReaderShelf, b: &ReaderShelf) -> SharedShelf {
    let keyed_a = first_by_key(a);
    let keyed_b = first_by_key(b);
    let lookup_b: HashMap<&MatchKey, &Book> = keyed_b.iter().map(|(k, book)| (k, *book)).collect();

    let shared_books: Vec<SharedBook> = keyed_a
        .iter()
        .filter_map(|(key, book_a)| {
            lookup_b.get(key).map(|book_b| SharedBook {
                title: book_a.title.clone(),
                author: book_a.author.clone(),
                rating_a: book_a.user_rating,
                rating_b: book_b.user_rating,
            })
        })
        .collect();

    let shared_count = shared_books.len();
    let only_a_count = keyed_a.len() - shared_count;
    let only_b_count = keyed_b.len() - shared_count;

    SharedShelf {
        shared_count,
        only_a_count,
        only_b_count,
        shared_books,
        chart_data: ChartData::from_counts([
            ("only_a", only_a_count),
            ("shared", shared_count),
            ("only_b", only_b_count),
        ]),
    }
}
