//! Paginated reading-history feed client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shelf_common::config::FeedSettings;

use crate::error::TransportError;

/// Source of raw feed pages
///
/// Abstracted so ingestion can run against canned pages in tests.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch page `page` (1-based) of the reader's read shelf as raw text
    async fn fetch_page(
        &self,
        reader_id: &str,
        page: u32,
        page_size: usize,
    ) -> Result<String, TransportError>;
}

/// Goodreads read-shelf RSS feed
pub struct GoodreadsFeed {
    client: Client,
    base_url: String,
}

impl GoodreadsFeed {
    pub fn new(settings: &FeedSettings, user_agent: &str) -> shelf_common::Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| {
                shelf_common::Error::Internal(format!("Build HTTP client failed: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of one feed page
    pub fn page_url(&self, reader_id: &str, page: u32, page_size: usize) -> String {
        format!(
            "{}/review/list_rss/{}?shelf=read&per_page={}&page={}",
            self.base_url, reader_id, page_size, page
        )
    }
}

#[async_trait]
impl FeedSource for GoodreadsFeed {
    async fn fetch_page(
        &self,
        reader_id: &str,
        page: u32,
        page_size: usize,
    ) -> Result<String, TransportError> {
        let url = self.page_url(reader_id, page, page_size);
        tracing::debug!(reader_id, page, "Requesting feed page");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}
