//! shelf-engine library interface
//!
//! Turns a reader's raw reading history into single-reader analytics and
//! two-reader comparisons:
//! ingest → normalize → {analytics, comparison} → chart data → store/API

pub mod analytics;
pub mod api;
pub mod comparison;
pub mod db;
pub mod error;
pub mod export;
pub mod ingest;
pub mod normalize;
pub mod payload;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::analytics::{compute_stats, AnalyticsResult};
pub use crate::comparison::{compare, compare_with_stats, ComparisonResult};
pub use crate::error::{ApiError, ApiResult, IngestError, IngestResult};
pub use crate::ingest::ShelfFetcher;

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            startup_time: Utc::now(),
        }
    }
}

/// Build the read-only API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::profile_routes())
        .merge(api::comparison_routes())
        .with_state(state)
}
