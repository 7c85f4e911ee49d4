//! Reading-history ingestion
//!
//! `ShelfFetcher::fetch_shelf` resolves the identifier, walks every feed page,
//! enriches each entry, and hands the result to normalization. Only the four
//! `IngestError` outcomes abort a run; lookup failures lower the shelf's
//! enrichment coverage instead.

pub mod enrichment;
pub mod feed;
pub mod genre_mapper;
pub mod identifier;
pub mod retry;
pub mod rss;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use shelf_common::config::{EnrichmentSettings, FeedSettings, TomlConfig};
use shelf_common::ReaderShelf;

pub use self::enrichment::{
    EnrichmentPool, EnrichmentRecord, EnrichmentReport, EnrichmentSource, OpenLibraryClient,
};
pub use self::feed::{FeedSource, GoodreadsFeed};
pub use self::identifier::parse_reader_id;

use self::retry::{retry_transient, RetryError, RetryPolicy};
use crate::error::{IngestError, IngestResult};
use crate::normalize;

/// One feed entry exactly as ingested, before any validation
///
/// Feed fields are kept as trimmed text (empty when absent); the lookup
/// fields are filled by the enrichment pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    pub source_id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub user_rating: String,
    pub average_rating: String,
    pub date_read: String,
    pub publication_year: String,
    pub num_pages: String,
    pub cover_url: String,
    pub review: String,
    #[serde(default)]
    pub enriched_genre: Option<String>,
    #[serde(default)]
    pub enriched_page_count: Option<u32>,
}

/// Everything the feed yielded for one reader
#[derive(Debug, Clone, Default)]
pub struct FeedHistory {
    pub reader_name: Option<String>,
    pub entries: Vec<RawEntry>,
    pub pages: u32,
}

/// Feed + lookup orchestration for one reader at a time
pub struct ShelfFetcher {
    feed: Arc<dyn FeedSource>,
    enrichment: EnrichmentPool,
    settings: FeedSettings,
}

impl ShelfFetcher {
    pub fn new(
        feed: Arc<dyn FeedSource>,
        lookup: Arc<dyn EnrichmentSource>,
        feed_settings: FeedSettings,
        enrichment_settings: &EnrichmentSettings,
    ) -> Self {
        Self {
            feed,
            enrichment: EnrichmentPool::new(lookup, enrichment_settings),
            settings: feed_settings,
        }
    }

    /// Build the HTTP-backed fetcher described by `config`
    pub fn from_config(config: &TomlConfig) -> shelf_common::Result<Self> {
        let feed = GoodreadsFeed::new(&config.feed, &config.user_agent)?;
        let lookup = OpenLibraryClient::new(&config.enrichment, &config.user_agent)?;
        Ok(Self::new(
            Arc::new(feed),
            Arc::new(lookup),
            config.feed.clone(),
            &config.enrichment,
        ))
    }

    /// Ingest, enrich and normalize one reader's read shelf
    pub async fn fetch_shelf(&self, identifier: &str) -> IngestResult<ReaderShelf> {
        let reader_id = parse_reader_id(identifier)?;
        tracing::info!(reader_id = %reader_id, "Fetching read shelf");

        let history = self.fetch_history(&reader_id).await?;
        if history.entries.is_empty() {
            return Err(IngestError::EmptyShelf(reader_id));
        }
        tracing::info!(
            reader_id = %reader_id,
            entries = history.entries.len(),
            pages = history.pages,
            "Feed complete"
        );

        let (entries, report) = self.enrichment.enrich(history.entries).await;
        let books = normalize::normalize(entries);

        let shelf = ReaderShelf::new(
            reader_id,
            history.reader_name,
            books,
            Utc::now(),
            report.enriched,
        );
        if shelf.enrichment_coverage < 1.0 {
            tracing::warn!(
                reader_id = %shelf.reader_id,
                coverage = shelf.enrichment_coverage,
                "Enrichment incomplete, continuing with partial data"
            );
        }
        Ok(shelf)
    }

    /// Walk feed pages until a short page, de-duplicating by source id
    pub async fn fetch_history(&self, reader_id: &str) -> IngestResult<FeedHistory> {
        let policy = RetryPolicy::new(self.settings.max_retries, self.settings.initial_backoff_ms);
        let page_size = self.settings.page_size.max(1);
        let mut history = FeedHistory::default();
        let mut seen: HashSet<String> = HashSet::new();
        let mut page = 1u32;

        loop {
            if page > 1 && self.settings.page_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.settings.page_delay_ms)).await;
            }

            let feed = self.feed.as_ref();
            let body = retry_transient("feed page", &policy, move || {
                feed.fetch_page(reader_id, page, page_size)
            })
            .await
            .map_err(|e| classify_feed_failure(reader_id, e))?;

            let parsed = rss::parse_feed_page(&body).map_err(|reason| {
                tracing::warn!(reader_id, page, reason = %reason, "Feed rejected");
                IngestError::ProfilePrivateOrInvalid(reader_id.to_string())
            })?;
            history.pages = page;

            if history.reader_name.is_none() {
                history.reader_name = parsed.reader_name;
            }

            let received = parsed.entries.len();
            let mut added = 0usize;
            for entry in parsed.entries {
                let key = dedupe_key(&entry);
                if seen.insert(key) {
                    history.entries.push(entry);
                    added += 1;
                }
            }
            tracing::debug!(reader_id, page, received, added, "Feed page processed");

            if received < page_size {
                break;
            }
            if added == 0 {
                tracing::warn!(reader_id, page, "Full page with no new entries, stopping");
                break;
            }
            page += 1;
        }

        Ok(history)
    }
}

/// Source id, or the same synthetic id normalization falls back to
fn dedupe_key(entry: &RawEntry) -> String {
    if entry.source_id.is_empty() {
        normalize::synthetic_id(&entry.title, &entry.author)
    } else {
        entry.source_id.clone()
    }
}

fn classify_feed_failure(reader_id: &str, err: RetryError) -> IngestError {
    if err.last_error.is_transient() {
        tracing::error!(reader_id, error = %err, "Feed unreachable");
        IngestError::NetworkFailure {
            attempts: err.attempts,
            message: err.last_error.to_string(),
        }
    } else if err.last_error.is_access_denied() {
        tracing::warn!(reader_id, error = %err, "Shelf is private or missing");
        IngestError::ProfilePrivateOrInvalid(reader_id.to_string())
    } else {
        tracing::warn!(reader_id, error = %err, "Feed refused");
        IngestError::ProfilePrivateOrInvalid(reader_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;

    #[test]
    fn test_classify_access_denied() {
        let err = RetryError {
            attempts: 1,
            last_error: TransportError::Status(403),
        };
        assert!(matches!(
            classify_feed_failure("1", err),
            IngestError::ProfilePrivateOrInvalid(id) if id == "1"
        ));
    }

    #[test]
    fn test_classify_other_refusal() {
        let err = RetryError {
            attempts: 1,
            last_error: TransportError::Status(400),
        };
        assert!(matches!(
            classify_feed_failure("1", err),
            IngestError::ProfilePrivateOrInvalid(id) if id == "1"
        ));
    }

    #[test]
    fn test_classify_exhausted_transient() {
        let err = RetryError {
            attempts: 4,
            last_error: TransportError::Timeout,
        };
        assert!(matches!(
            classify_feed_failure("1", err),
            IngestError::NetworkFailure { attempts: 4, .. }
        ));
    }

    #[test]
    fn test_dedupe_key_falls_back_to_title_author() {
        let entry = RawEntry {
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            ..RawEntry::default()
        };
        assert_eq!(dedupe_key(&entry), "Dune|Frank Herbert");
    }
}
