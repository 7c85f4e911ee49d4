//! Read-only HTTP API over a populated store

mod helpers;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use helpers::{comparison, create_test_db, profile};
use serde_json::Value;
use shelf_engine::db::{comparisons, profiles};
use shelf_engine::{build_router, AppState};
use tempfile::TempDir;
use tower::ServiceExt;

async fn setup() -> (TempDir, Router) {
    let (dir, pool) = create_test_db().await.unwrap();

    let a = profile("1", "Ann", &[("Emma", 5), ("Dune", 2)]);
    let b = profile("2", "Ben", &[("Emma", 1)]);
    profiles::upsert_profile(&pool, &a).await.unwrap();
    profiles::upsert_profile(&pool, &b).await.unwrap();
    comparisons::upsert_comparison(&pool, &comparison(&a, &b))
        .await
        .unwrap();

    (dir, build_router(AppState::new(pool)))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_reports_database() {
    let (_dir, app) = setup().await;

    let (status, body) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "shelf-engine");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn test_profile_returned_with_stats() {
    let (_dir, app) = setup().await;

    let (status, body) = get(app, "/api/profile/1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reader_id"], "1");
    assert_eq!(body["payload"]["book_count"], 2);
    assert_eq!(
        body["payload"]["stats"]["rating_distribution"]["chart_data"]["labels"],
        serde_json::json!(["1", "2", "3", "4", "5"])
    );
}

#[tokio::test]
async fn test_missing_profile_is_json_404() {
    let (_dir, app) = setup().await;

    let (status, body) = get(app, "/api/profile/999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_recent_profiles_limit() {
    let (_dir, app) = setup().await;

    let (status, body) = get(app.clone(), "/api/profiles/recent?limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, body) = get(app, "/api/profiles/recent?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_comparison_in_either_order() {
    let (_dir, app) = setup().await;

    let (status, forward) = get(app.clone(), "/api/comparison/1/2").await;
    assert_eq!(status, StatusCode::OK);
    let (status, reverse) = get(app.clone(), "/api/comparison/2/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(forward, reverse);
    assert_eq!(
        forward["payload"]["comparison"]["shared_shelf"]["shared_count"],
        1
    );

    let (status, _) = get(app, "/api/comparison/1/3").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recent_comparisons_listing() {
    let (_dir, app) = setup().await;

    let (status, body) = get(app.clone(), "/api/comparisons/recent").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["reader_a"], "1");
    assert_eq!(body[0]["reader_b"], "2");
    assert!(body[0].get("payload").is_none());

    let (status, body) = get(app, "/api/comparisons/recent?limit=101").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}
