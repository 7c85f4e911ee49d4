//! Profile endpoints

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::db::profiles::{self, ProfileSummary, StoredProfile};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

use super::RecentQuery;

/// GET /api/profile/:reader_id
pub async fn get_profile(
    State(state): State<AppState>,
    Path(reader_id): Path<String>,
) -> ApiResult<Json<StoredProfile>> {
    profiles::get_profile(&state.db, &reader_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No profile stored for reader {}", reader_id)))
}

/// GET /api/profiles/recent?limit=N
pub async fn recent_profiles(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> ApiResult<Json<Vec<ProfileSummary>>> {
    let limit = query.limit()?;
    Ok(Json(profiles::recent_profiles(&state.db, limit).await?))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/api/profile/:reader_id", get(get_profile))
        .route("/api/profiles/recent", get(recent_profiles))
}
