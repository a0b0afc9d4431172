//! Integration tests for the HTTP query surface
//!
//! Exercise routing, parameter handling, and response shapes against an
//! in-memory snapshot store.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::DateTime;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use tally_api::{AppState, build_router};
use tally_engine::{RevenueObservation, Snapshot};
use tally_store::StatsDb;

const HOUR_MS: i64 = 3_600_000;

async fn test_app() -> (Router, Arc<StatsDb>) {
    let db = Arc::new(StatsDb::memory().await.unwrap());
    (build_router(AppState::new(db.clone())), db)
}

async fn seed_snapshot(db: &StatsDb, entity: &str, hours: i64, downloads: u64) {
    db.snapshots()
        .append(&Snapshot {
            source: "modrinth".into(),
            entity: entity.into(),
            timestamp: DateTime::from_timestamp_millis(hours * HOUR_MS).unwrap(),
            downloads,
            followers: Some(5),
            versions: 2,
        })
        .await
        .unwrap();
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let (app, _db) = test_app().await;

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_downloads_default_interval() {
    let (app, db) = test_app().await;
    seed_snapshot(&db, "some-mod", 0, 10).await;
    seed_snapshot(&db, "some-mod", 25, 40).await;
    seed_snapshot(&db, "some-mod", 50, 90).await;

    let (status, body) = get_json(&app, "/downloads/modrinth").await;
    assert_eq!(status, StatusCode::OK);

    let buckets = body.as_array().unwrap();
    assert_eq!(buckets.len(), 2);

    assert_eq!(buckets[0]["project"], "some-mod");
    assert_eq!(buckets[0]["timestamp"], 24 * HOUR_MS);
    assert_eq!(buckets[0]["downloads"], 40);
    assert_eq!(buckets[0]["downloads_diff"], 30);
    assert_eq!(buckets[0]["followers"], 5);
    assert_eq!(buckets[0]["versions"], 2);

    assert_eq!(buckets[1]["timestamp"], 48 * HOUR_MS);
    assert_eq!(buckets[1]["downloads"], 90);
    assert_eq!(buckets[1]["downloads_diff"], 50);
}

#[tokio::test]
async fn test_downloads_with_falloff() {
    let (app, db) = test_app().await;
    seed_snapshot(&db, "some-mod", 0, 10).await;
    seed_snapshot(&db, "some-mod", 25, 40).await;
    seed_snapshot(&db, "some-mod", 50, 90).await;

    let (status, body) = get_json(&app, "/downloads/modrinth?falloff=true").await;
    assert_eq!(status, StatusCode::OK);

    let buckets = body.as_array().unwrap();
    assert_eq!(buckets.len(), 3);

    // Trailing partial sits at the last snapshot's own timestamp.
    assert_eq!(buckets[2]["timestamp"], 50 * HOUR_MS);
    assert_eq!(buckets[2]["downloads"], 90);
    assert_eq!(buckets[2]["downloads_diff"], 0);
}

#[tokio::test]
async fn test_downloads_custom_interval() {
    let (app, db) = test_app().await;
    seed_snapshot(&db, "some-mod", 0, 10).await;
    seed_snapshot(&db, "some-mod", 13, 40).await;

    // hours=12: the second snapshot closes the first window.
    let (status, body) = get_json(&app, "/downloads/modrinth?hours=12").await;
    assert_eq!(status, StatusCode::OK);

    let buckets = body.as_array().unwrap();
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0]["timestamp"], 12 * HOUR_MS);
    assert_eq!(buckets[0]["downloads_diff"], 30);
}

#[tokio::test]
async fn test_downloads_rejects_non_positive_hours() {
    let (app, _db) = test_app().await;

    let (status, body) = get_json(&app, "/downloads/modrinth?hours=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, _body) = get_json(&app, "/downloads/modrinth?hours=-5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _body) = get_json(&app, "/downloads/modrinth?hours=999999999").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_downloads_unknown_source_is_empty() {
    let (app, _db) = test_app().await;

    let (status, body) = get_json(&app, "/downloads/hangar").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_downloads_multiple_entities_flat_list() {
    let (app, db) = test_app().await;
    seed_snapshot(&db, "mod-a", 0, 10).await;
    seed_snapshot(&db, "mod-b", 0, 100).await;
    seed_snapshot(&db, "mod-a", 25, 40).await;
    seed_snapshot(&db, "mod-b", 26, 150).await;

    let (status, body) = get_json(&app, "/downloads/modrinth").await;
    assert_eq!(status, StatusCode::OK);

    let buckets = body.as_array().unwrap();
    let projects: Vec<&str> = buckets
        .iter()
        .map(|b| b["project"].as_str().unwrap())
        .collect();
    assert_eq!(projects, vec!["mod-a", "mod-b"]);
    assert_eq!(buckets[0]["downloads_diff"], 30);
    assert_eq!(buckets[1]["downloads_diff"], 50);
}

#[tokio::test]
async fn test_revenue_pass_through() {
    let (app, db) = test_app().await;

    for (ms, all_time, balance) in [(1_000, 10.5, 2.5), (2_000, 12.0, 4.0)] {
        db.revenue()
            .append(&RevenueObservation {
                source: "modrinth".into(),
                user: "alice".into(),
                timestamp: DateTime::from_timestamp_millis(ms).unwrap(),
                all_time_balance: all_time,
                balance,
            })
            .await
            .unwrap();
    }

    let (status, body) = get_json(&app, "/revenue/alice/modrinth").await;
    assert_eq!(status, StatusCode::OK);

    let points = body.as_array().unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0]["timestamp"], 1_000);
    assert_eq!(points[0]["all_time_balance"], 10.5);
    assert_eq!(points[0]["balance"], 2.5);
    assert_eq!(points[1]["timestamp"], 2_000);

    // Raw pass-through: exactly the three documented fields.
    let keys: Vec<&String> = points[0].as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 3);
}

#[tokio::test]
async fn test_revenue_unknown_user_is_empty() {
    let (app, _db) = test_app().await;

    let (status, body) = get_json(&app, "/revenue/nobody/modrinth").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}
