//! Read-only HTTP API for stored results

use serde::Deserialize;

use crate::error::ApiError;

pub mod comparisons;
pub mod health;
pub mod profiles;

pub use comparisons::comparison_routes;
pub use health::health_routes;
pub use profiles::profile_routes;

const DEFAULT_RECENT_LIMIT: u32 = 20;
const MAX_RECENT_LIMIT: u32 = 100;

/// `?limit=N` for the recent listings
#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<u32>,
}

impl RecentQuery {
    /// Requested limit, or the default; must be within 1..=100
    pub fn limit(&self) -> Result<u32, ApiError> {
        let limit = self.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
        if limit == 0 || limit > MAX_RECENT_LIMIT {
            return Err(ApiError::BadRequest(format!(
                "limit must be between 1 and {}",
                MAX_RECENT_LIMIT
            )));
        }
        Ok(limit)
    }
}
