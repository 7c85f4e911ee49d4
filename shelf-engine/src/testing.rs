//! Shelf builders shared by unit tests

use chrono::{NaiveDate, TimeZone, Utc};
use shelf_common::{Book, ReaderShelf, DEFAULT_GENRE};

pub(crate) struct BookBuilder(Book);

/// A book with only a title; author defaults to "Anon"
pub(crate) fn book(title: &str) -> BookBuilder {
    BookBuilder(Book {
        source_id: title.to_string(),
        title: title.to_string(),
        author: "Anon".to_string(),
        user_rating: None,
        average_rating: None,
        date_read: None,
        publication_year: None,
        page_count: None,
        genre: DEFAULT_GENRE.to_string(),
        review_text: None,
        isbn: None,
        cover_url: None,
    })
}

impl BookBuilder {
    pub(crate) fn id(mut self, id: &str) -> Self {
        self.0.source_id = id.to_string();
        self
    }

    pub(crate) fn author(mut self, author: &str) -> Self {
        self.0.author = author.to_string();
        self
    }

    pub(crate) fn rated(mut self, rating: u8) -> Self {
        self.0.user_rating = Some(rating);
        self
    }

    pub(crate) fn avg(mut self, average: f64) -> Self {
        self.0.average_rating = Some(average);
        self
    }

    pub(crate) fn read(mut self, y: i32, m: u32, d: u32) -> Self {
        self.0.date_read = NaiveDate::from_ymd_opt(y, m, d);
        self
    }

    pub(crate) fn year(mut self, year: i32) -> Self {
        self.0.publication_year = Some(year);
        self
    }

    pub(crate) fn pages(mut self, pages: u32) -> Self {
        self.0.page_count = Some(pages);
        self
    }

    pub(crate) fn genre(mut self, genre: &str) -> Self {
        self.0.genre = genre.to_string();
        self
    }

    pub(crate) fn review(mut self, text: &str) -> Self {
        self.0.review_text = Some(text.to_string());
        self
    }

    pub(crate) fn build(self) -> Book {
        self.0
    }
}

/// Fully enriched shelf with a fixed fetch time
pub(crate) fn shelf(reader_id: &str, books: Vec<Book>) -> ReaderShelf {
    let enriched = books.len();
    let fetched_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    ReaderShelf::new(reader_id, None, books, fetched_at, enriched)
}

pub(crate) fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
