//! Genre and page-count lookup
//!
//! Every lookup is independent and may fail without affecting the others.
//! A pool of workers drains one shared job queue while a single rate limiter
//! spaces requests across all of them; with one worker the behaviour is the
//! plain sequential loop.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use shelf_common::config::EnrichmentSettings;
use tokio::sync::{mpsc, Mutex};

use super::genre_mapper;
use super::retry::{retry_transient, RetryPolicy};
use super::RawEntry;
use crate::error::TransportError;

/// What a lookup source knows about one book
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentRecord {
    pub genre: Option<String>,
    pub page_count: Option<u32>,
}

/// Secondary metadata source
#[async_trait]
pub trait EnrichmentSource: Send + Sync {
    /// `Ok(None)` when the source has no matching document
    async fn lookup(
        &self,
        title: &str,
        author: &str,
    ) -> Result<Option<EnrichmentRecord>, TransportError>;
}

// ============================================================================
// OpenLibrary search
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    #[serde(default)]
    subject: Vec<String>,
    number_of_pages_median: Option<u32>,
}

/// OpenLibrary `search.json` client
pub struct OpenLibraryClient {
    client: Client,
    base_url: String,
}

impl OpenLibraryClient {
    pub fn new(settings: &EnrichmentSettings, user_agent: &str) -> shelf_common::Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| {
                shelf_common::Error::Internal(format!("Build HTTP client failed: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl EnrichmentSource for OpenLibraryClient {
    async fn lookup(
        &self,
        title: &str,
        author: &str,
    ) -> Result<Option<EnrichmentRecord>, TransportError> {
        let url = format!("{}/search.json", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("title", title),
                ("author", author),
                ("limit", "1"),
                ("fields", "subject,number_of_pages_median"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(body.docs.into_iter().next().map(|doc| EnrichmentRecord {
            genre: genre_mapper::primary_genre(&doc.subject).map(str::to_string),
            page_count: doc.number_of_pages_median.filter(|p| *p > 0),
        }))
    }
}

// ============================================================================
// Worker pool
// ============================================================================

/// Per-entry lookup result
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(EnrichmentRecord),
    NotFound,
    Failed(String),
}

/// Summary of one enrichment pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    pub total: usize,
    pub enriched: usize,
    pub failed: usize,
}

/// Concurrent lookup pool sharing one request-rate ceiling
pub struct EnrichmentPool {
    source: Arc<dyn EnrichmentSource>,
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
    retry: RetryPolicy,
    workers: usize,
}

impl EnrichmentPool {
    pub fn new(source: Arc<dyn EnrichmentSource>, settings: &EnrichmentSettings) -> Self {
        // Zero delay disables the ceiling entirely
        let limiter = Quota::with_period(Duration::from_millis(settings.delay_ms))
            .map(|quota| quota.allow_burst(NonZeroU32::MIN))
            .map(|quota| Arc::new(RateLimiter::direct(quota)));

        Self {
            source,
            limiter,
            retry: RetryPolicy::new(settings.max_retries, settings.initial_backoff_ms),
            workers: settings.workers.max(1),
        }
    }

    /// Look up every entry and fold the results back in, in input order
    pub async fn enrich(&self, mut entries: Vec<RawEntry>) -> (Vec<RawEntry>, EnrichmentReport) {
        let total = entries.len();
        let mut report = EnrichmentReport {
            total,
            ..EnrichmentReport::default()
        };
        if total == 0 {
            return (entries, report);
        }

        tracing::info!(total, workers = self.workers, "Enriching entries");

        let (job_tx, job_rx) = mpsc::channel::<(usize, String, String)>(total);
        for (index, entry) in entries.iter().enumerate() {
            // Capacity equals the job count, so this never waits
            if job_tx
                .send((index, entry.title.clone(), entry.author.clone()))
                .await
                .is_err()
            {
                break;
            }
        }
        drop(job_tx);

        let job_rx = Arc::new(Mutex::new(job_rx));
        let (result_tx, mut result_rx) = mpsc::channel::<(usize, LookupOutcome)>(total);

        let mut handles = Vec::with_capacity(self.workers);
        for worker_id in 0..self.workers.min(total) {
            let jobs = Arc::clone(&job_rx);
            let results = result_tx.clone();
            let source = Arc::clone(&self.source);
            let limiter = self.limiter.clone();
            let retry = self.retry.clone();

            handles.push(tokio::spawn(async move {
                loop {
                    let job = {
                        let mut rx = jobs.lock().await;
                        rx.recv().await
                    };
                    let Some((index, title, author)) = job else {
                        break;
                    };

                    let outcome =
                        lookup_one(source.as_ref(), limiter.as_deref(), &retry, &title, &author)
                            .await;
                    if results.send((index, outcome)).await.is_err() {
                        break;
                    }
                }
                tracing::debug!(worker_id, "Enrichment worker finished");
            }));
        }
        drop(result_tx);

        let mut outcomes: Vec<Option<LookupOutcome>> = vec![None; total];
        let mut done = 0usize;
        while let Some((index, outcome)) = result_rx.recv().await {
            outcomes[index] = Some(outcome);
            done += 1;
            if done % 10 == 0 || done == total {
                tracing::info!(done, total, "Enrichment progress");
            }
        }

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Enrichment worker panicked");
            }
        }

        for (entry, outcome) in entries.iter_mut().zip(outcomes) {
            match outcome {
                Some(LookupOutcome::Found(record)) => {
                    entry.enriched_genre = record.genre;
                    entry.enriched_page_count = record.page_count;
                    report.enriched += 1;
                }
                Some(LookupOutcome::NotFound) => {
                    tracing::warn!(title = %entry.title, "No lookup match");
                    report.failed += 1;
                }
                Some(LookupOutcome::Failed(reason)) => {
                    tracing::warn!(title = %entry.title, reason = %reason, "Lookup failed");
                    report.failed += 1;
                }
                None => {
                    tracing::warn!(title = %entry.title, "Lookup never completed");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            enriched = report.enriched,
            failed = report.failed,
            total,
            "Enrichment finished"
        );
        (entries, report)
    }
}

async fn lookup_one(
    source: &dyn EnrichmentSource,
    limiter: Option<&DefaultDirectRateLimiter>,
    retry: &RetryPolicy,
    title: &str,
    author: &str,
) -> LookupOutcome {
    if title.is_empty() {
        return LookupOutcome::NotFound;
    }

    let result = retry_transient("subject lookup", retry, move || async move {
        if let Some(limiter) = limiter {
            limiter.until_ready().await;
        }
        source.lookup(title, author).await
    })
    .await;

    match result {
        Ok(Some(record)) => LookupOutcome::Found(record),
        Ok(None) => LookupOutcome::NotFound,
        Err(e) => LookupOutcome::Failed(e.to_string()),
    }
}
