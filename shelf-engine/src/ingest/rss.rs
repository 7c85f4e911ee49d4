//! Read-shelf RSS page decoding
//!
//! One page of the feed is an RSS 2.0 document whose `<item>`s carry the
//! book fields as flat child elements, plus a nested `<book>` element holding
//! the page count.

use std::sync::OnceLock;

use quick_xml::de::from_str;
use regex::Regex;
use serde::Deserialize;

use super::RawEntry;

#[derive(Debug, Deserialize)]
struct RssDocument {
    channel: Option<Channel>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(default)]
    title: Option<String>,
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Item {
    title: Option<String>,
    book_id: Option<String>,
    author_name: Option<String>,
    isbn: Option<String>,
    user_rating: Option<String>,
    average_rating: Option<String>,
    user_read_at: Option<String>,
    book_published: Option<String>,
    book_image_url: Option<String>,
    book_large_image_url: Option<String>,
    user_review: Option<String>,
    book: Option<ItemBook>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ItemBook {
    num_pages: Option<String>,
}

/// Why a page body was treated as a private or invalid shelf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRejection {
    EmptyBody,
    PrivateNotice,
    Malformed(String),
    NoChannel,
    NoContent,
}

impl std::fmt::Display for PageRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageRejection::EmptyBody => write!(f, "empty response body"),
            PageRejection::PrivateNotice => write!(f, "private profile notice"),
            PageRejection::Malformed(e) => write!(f, "malformed feed: {}", e),
            PageRejection::NoChannel => write!(f, "feed has no channel"),
            PageRejection::NoContent => write!(f, "feed has neither items nor a title"),
        }
    }
}

/// One decoded feed page
#[derive(Debug, Clone, Default)]
pub struct FeedPage {
    /// Display name from a `NAME's bookshelf: read` channel title
    pub reader_name: Option<String>,
    pub entries: Vec<RawEntry>,
}

fn shelf_title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(.+?)(?:'s|\x{2019}s) bookshelf").expect("valid regex"))
}

/// Reader name embedded in a shelf channel title
pub fn reader_name_from_title(title: &str) -> Option<String> {
    shelf_title_pattern()
        .captures(title.trim())
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Decode one page, rejecting bodies that signal a private or invalid shelf
pub fn parse_feed_page(body: &str) -> Result<FeedPage, PageRejection> {
    if body.trim().is_empty() {
        return Err(PageRejection::EmptyBody);
    }

    // A notice only counts when the body carries no books; descriptions may
    // legitimately contain both words.
    let lower = body.to_lowercase();
    let private_notice = lower.contains("private") && lower.contains("profile");
    let reject = |fallback: PageRejection| {
        if private_notice {
            PageRejection::PrivateNotice
        } else {
            fallback
        }
    };

    let document: RssDocument =
        from_str(body).map_err(|e| reject(PageRejection::Malformed(e.to_string())))?;
    let channel = document
        .channel
        .ok_or_else(|| reject(PageRejection::NoChannel))?;

    let title = channel
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if channel.items.is_empty() {
        if private_notice {
            return Err(PageRejection::PrivateNotice);
        }
        if title.is_none() {
            return Err(PageRejection::NoContent);
        }
    }

    Ok(FeedPage {
        reader_name: title.and_then(reader_name_from_title),
        entries: channel.items.into_iter().map(item_to_entry).collect(),
    })
}

fn text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn item_to_entry(item: Item) -> RawEntry {
    let large_cover = text(item.book_large_image_url);
    let cover_url = if large_cover.is_empty() {
        text(item.book_image_url)
    } else {
        large_cover
    };

    RawEntry {
        source_id: text(item.book_id),
        title: text(item.title),
        author: text(item.author_name),
        isbn: text(item.isbn),
        user_rating: text(item.user_rating),
        average_rating: text(item.average_rating),
        date_read: text(item.user_read_at),
        publication_year: text(item.book_published),
        num_pages: text(item.book.and_then(|b| b.num_pages)),
        cover_url,
        review: text(item.user_review),
        enriched_genre: None,
        enriched_page_count: None,
    }
}
