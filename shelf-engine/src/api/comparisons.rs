//! Comparison endpoints

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::db::comparisons::{self, ComparisonSummary, StoredComparison};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

use super::RecentQuery;

/// GET /api/comparison/:reader_a/:reader_b (either order)
pub async fn get_comparison(
    State(state): State<AppState>,
    Path((reader_a, reader_b)): Path<(String, String)>,
) -> ApiResult<Json<StoredComparison>> {
    comparisons::get_comparison(&state.db, &reader_a, &reader_b)
        .await?
        .map(Json)
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "No comparison stored for readers {} and {}",
                reader_a, reader_b
            ))
        })
}

/// GET /api/comparisons/recent?limit=N
pub async fn recent_comparisons(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> ApiResult<Json<Vec<ComparisonSummary>>> {
    let limit = query.limit()?;
    Ok(Json(comparisons::recent_comparisons(&state.db, limit).await?))
}

pub fn comparison_routes() -> Router<AppState> {
    Router::new()
        .route("/api/comparison/:reader_a/:reader_b", get(get_comparison))
        .route("/api/comparisons/recent", get(recent_comparisons))
}
