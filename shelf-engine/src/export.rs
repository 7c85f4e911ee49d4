//! Tab-separated views handed to an external AI collaborator

use shelf_common::Book;

const BOOKS_HEADER: [&str; 8] = [
    "title",
    "author",
    "user_rating",
    "average_rating",
    "date_read",
    "publication_year",
    "page_count",
    "genre",
];

const REVIEWS_HEADER: [&str; 4] = ["title", "author", "user_rating", "review"];

/// Tabs and line breaks would split cells or rows
fn cell(value: &str) -> String {
    value
        .chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect()
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn row(cells: &[String]) -> String {
    let mut line = cells.join("\t");
    line.push('\n');
    line
}

/// One row per book, header first
pub fn books_table(books: &[Book]) -> String {
    let mut out = row(&BOOKS_HEADER.map(String::from));
    for book in books {
        out.push_str(&row(&[
            cell(&book.title),
            cell(&book.author),
            opt(book.user_rating),
            opt(book.average_rating),
            opt(book.date_read),
            opt(book.publication_year),
            opt(book.page_count),
            cell(&book.genre),
        ]));
    }
    out
}

/// One row per book that has review text, header first
pub fn reviews_table(books: &[Book]) -> String {
    let mut out = row(&REVIEWS_HEADER.map(String::from));
    for book in books {
        if let Some(review) = book.review_text.as_deref() {
            out.push_str(&row(&[
                cell(&book.title),
                cell(&book.author),
                opt(book.user_rating),
                cell(review),
            ]));
        }
    }
    out
}
